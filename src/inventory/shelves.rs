use std::collections::HashMap;

use crate::model::{Product, ShelfCode};

use super::ShelfError;

/// A slot holding at most one product type and a quantity.
#[derive(Debug, Clone)]
pub struct Shelf {
    code: ShelfCode,
    product: Option<Product>,
    quantity: u32,
}

impl Shelf {
    fn new(code: ShelfCode) -> Self {
        Self {
            code,
            product: None,
            quantity: 0,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn is_available(&self) -> bool {
        self.product.is_some() && self.quantity > 0
    }
}

/// Shelves of the machine, keyed by code.
#[derive(Debug, Default)]
pub struct ShelfInventory {
    shelves: HashMap<ShelfCode, Shelf>,
}

impl ShelfInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty shelf. Does nothing if the shelf already exists.
    pub fn add_shelf(&mut self, code: &str) -> Result<(), ShelfError> {
        let code = Self::validate_code(code)?;
        self.shelves
            .entry(code.to_string())
            .or_insert_with(|| Shelf::new(code.to_string()));
        Ok(())
    }

    /// Assign `product` to the shelf and set its quantity, creating the shelf if needed.
    pub fn stock(
        &mut self,
        code: &str,
        product: Product,
        quantity: u32,
    ) -> Result<(), ShelfError> {
        let code = Self::validate_code(code)?;
        let shelf = self
            .shelves
            .entry(code.to_string())
            .or_insert_with(|| Shelf::new(code.to_string()));
        shelf.product = Some(product);
        shelf.quantity = quantity;
        Ok(())
    }

    pub fn add_stock(&mut self, code: &str, amount: u32) -> Result<(), ShelfError> {
        let shelf = self
            .shelves
            .get_mut(code)
            .ok_or_else(|| ShelfError::NotFound(code.to_string()))?;
        shelf.quantity = shelf
            .quantity
            .checked_add(amount)
            .ok_or(ShelfError::InvalidArgument("shelf quantity would overflow"))?;
        Ok(())
    }

    pub fn is_available(&self, code: &str) -> bool {
        self.shelves.get(code).is_some_and(Shelf::is_available)
    }

    pub fn product(&self, code: &str) -> Result<&Product, ShelfError> {
        let shelf = self
            .shelves
            .get(code)
            .ok_or_else(|| ShelfError::NotFound(code.to_string()))?;
        shelf
            .product()
            .ok_or_else(|| ShelfError::NoProduct(code.to_string()))
    }

    /// Remove exactly one unit from the shelf.
    pub fn dispense(&mut self, code: &str) -> Result<Product, ShelfError> {
        let shelf = self
            .shelves
            .get_mut(code)
            .filter(|shelf| shelf.is_available())
            .ok_or_else(|| ShelfError::NotAvailable(code.to_string()))?;
        let product = shelf
            .product
            .clone()
            .ok_or_else(|| ShelfError::NoProduct(code.to_string()))?;
        shelf.quantity -= 1;
        Ok(product)
    }

    /// All shelves, sorted by code.
    pub fn shelves(&self) -> Vec<&Shelf> {
        let mut shelves: Vec<&Shelf> = self.shelves.values().collect();
        shelves.sort_by(|a, b| a.code.cmp(&b.code));
        shelves
    }

    /// Codes are stored as given; only blank codes are rejected.
    fn validate_code(code: &str) -> Result<&str, ShelfError> {
        if code.trim().is_empty() {
            return Err(ShelfError::InvalidArgument("shelf code cannot be empty"));
        }
        Ok(code)
    }
}
