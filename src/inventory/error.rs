//! Error types for the shelf and coin inventories.

use thiserror::Error;

use crate::model::{Coin, ShelfCode};

/// Error from the coin ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("cannot add {1} x {0}: coin count would overflow")]
    InvalidArgument(Coin, u32),
}

/// Error from the shelf inventory.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShelfError {
    #[error("invalid shelf argument: {0}")]
    InvalidArgument(&'static str),

    #[error("shelf {0} does not exist")]
    NotFound(ShelfCode),

    #[error("no product assigned to shelf {0}")]
    NoProduct(ShelfCode),

    #[error("product at shelf {0} is not available")]
    NotAvailable(ShelfCode),
}
