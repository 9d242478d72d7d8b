//! Core domain types for the vending machine.

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::Amount;

/// Shelf identifier, e.g. `A3`.
pub type ShelfCode = String;

/// Coin denominations accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coin {
    Penny,
    Nickel,
    Dime,
    Quarter,
    Dollar,
}

impl Coin {
    /// Every denomination, ascending by value.
    pub const ALL: [Coin; 5] = [
        Coin::Penny,
        Coin::Nickel,
        Coin::Dime,
        Coin::Quarter,
        Coin::Dollar,
    ];

    pub const fn value(self) -> Amount {
        let cents = match self {
            Coin::Penny => 1,
            Coin::Nickel => 5,
            Coin::Dime => 10,
            Coin::Quarter => 25,
            Coin::Dollar => 100,
        };
        Amount::from_cents(cents)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Coin::Penny => "PENNY",
            Coin::Nickel => "NICKEL",
            Coin::Dime => "DIME",
            Coin::Quarter => "QUARTER",
            Coin::Dollar => "DOLLAR",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Coin> {
        Coin::ALL
            .into_iter()
            .find(|coin| coin.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Total value of a collection of coins.
pub fn coins_value<'a>(coins: impl IntoIterator<Item = &'a Coin>) -> Amount {
    coins.into_iter().map(|coin| coin.value()).sum()
}

/// Error when building a [`Product`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("invalid product: {0}")]
    InvalidArgument(&'static str),
}

/// A product sold by the machine. Two products are equal when their ids are.
#[derive(Debug, Clone)]
pub struct Product {
    id: String,
    name: String,
    price: Amount,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Amount,
    ) -> Result<Self, ProductError> {
        let id = id.into();
        let name = name.into();
        if id.trim().is_empty() {
            return Err(ProductError::InvalidArgument("id cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(ProductError::InvalidArgument("name cannot be empty"));
        }
        Ok(Self { id, name, price })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Amount {
        self.price
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.id, self.price)
    }
}

/// An input of the machine: either a customer action or an admin/setup action.
#[derive(Debug, Clone)]
pub enum Command {
    /// Register an empty shelf.
    AddShelf { shelf: ShelfCode },
    /// Assign a product to a shelf and set its quantity.
    Stock {
        shelf: ShelfCode,
        product: Product,
        quantity: u32,
    },
    /// Add units to an existing shelf.
    Restock { shelf: ShelfCode, amount: u32 },
    /// Load coins into the change ledger.
    LoadCoins { coin: Coin, count: u32 },
    /// Customer inserts a coin.
    InsertCoin(Coin),
    /// Customer picks a shelf.
    Select(ShelfCode),
    /// Customer asks for the selected product.
    Dispense,
    /// Customer aborts and gets the inserted coins back.
    Cancel,
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::AddShelf { .. } => "add_shelf",
            Command::Stock { .. } => "stock",
            Command::Restock { .. } => "restock",
            Command::LoadCoins { .. } => "load",
            Command::InsertCoin(_) => "insert",
            Command::Select(_) => "select",
            Command::Dispense => "dispense",
            Command::Cancel => "cancel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coins_are_sorted_ascending_by_value() {
        let values: Vec<u64> = Coin::ALL.iter().map(|c| c.value().cents()).collect();
        assert_eq!(values, vec![1, 5, 10, 25, 100]);
    }

    #[test]
    fn coin_from_name_ignores_case() {
        assert_eq!(Coin::from_name("quarter"), Some(Coin::Quarter));
        assert_eq!(Coin::from_name(" DOLLAR "), Some(Coin::Dollar));
        assert_eq!(Coin::from_name("euro"), None);
    }

    #[test]
    fn coins_value_sums() {
        let coins = [Coin::Dollar, Coin::Quarter, Coin::Penny];
        assert_eq!(coins_value(&coins), Amount::from_cents(126));
        assert_eq!(coins_value(&[] as &[Coin]), Amount::ZERO);
    }

    #[test]
    fn product_rejects_empty_fields() {
        assert_eq!(
            Product::new("", "Water", Amount::from_cents(100)),
            Err(ProductError::InvalidArgument("id cannot be empty"))
        );
        assert_eq!(
            Product::new("WATER", "  ", Amount::from_cents(100)),
            Err(ProductError::InvalidArgument("name cannot be empty"))
        );
    }

    #[test]
    fn product_equality_is_by_id() {
        let a = Product::new("COKE", "Coca-Cola", Amount::from_cents(150)).unwrap();
        let b = Product::new("COKE", "Coke Zero", Amount::from_cents(175)).unwrap();
        let c = Product::new("PEPSI", "Coca-Cola", Amount::from_cents(150)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn product_display() {
        let p = Product::new("CANDY", "Chocolate Bar", Amount::from_cents(75)).unwrap();
        assert_eq!(p.to_string(), "Chocolate Bar (CANDY, $0.75)");
    }
}
