//! Machine-held stock: products on shelves and coins for change.

mod error;
pub use error::{LedgerError, ShelfError};

mod ledger;
pub use ledger::CoinLedger;

mod shelves;
pub use shelves::{Shelf, ShelfInventory};
