pub mod amount;
pub mod csv;
pub mod inventory;
pub mod machine;
pub mod model;

pub use amount::Amount;
pub use machine::{MachineError, MachineState, Outcome, Vend, VendingMachine};
pub use model::{Coin, Command, Product, ShelfCode};
