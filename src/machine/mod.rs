//! Vending machine facade.
//!
//! The machine owns the transaction state, the customer session and both
//! inventories. Every customer operation is dispatched to the active
//! [`MachineState`], which returns the next state along with the result.
//! Also supports an async stream of commands.

use std::mem;

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::inventory::{CoinLedger, ShelfInventory};
use crate::model::{Coin, Command, Product};

mod state;
pub use state::{MachineState, Session, Vend};
use state::Transition;

mod error;
pub use error::{MachineError, Operation};

/// What a successfully applied [`Command`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command changed the machine and has nothing to hand out.
    Done,
    /// A product was dispensed, possibly with change.
    Vended(Vend),
    /// Coins were handed back to the customer.
    Refunded(Vec<Coin>),
}

/// A coin-operated vending machine.
#[derive(Debug, Default)]
pub struct VendingMachine {
    state: MachineState,
    session: Session,
    shelves: ShelfInventory,
    ledger: CoinLedger,
}

/// Public API
impl VendingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the machine over the given command stream, one command at a time.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) {
        while let Some(command) = stream.next().await {
            // a failed command never stops the machine; it is logged by `apply`
            let _ = self.apply(command);
        }
    }

    /// Apply a single command on top of the current machine state.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        let kind = command.kind();
        let result = match command {
            Command::AddShelf { shelf } => self.add_shelf(&shelf).map(|()| Outcome::Done),
            Command::Stock {
                shelf,
                product,
                quantity,
            } => self
                .stock_product(&shelf, product, quantity)
                .map(|()| Outcome::Done),
            Command::Restock { shelf, amount } => {
                self.add_stock(&shelf, amount).map(|()| Outcome::Done)
            }
            Command::LoadCoins { coin, count } => {
                self.load_coins(coin, count).map(|()| Outcome::Done)
            }
            Command::InsertCoin(coin) => self.insert_coin(coin).map(|()| Outcome::Done),
            Command::Select(shelf) => self.select_product(&shelf).map(|()| Outcome::Done),
            Command::Dispense => self.dispense_product().map(Outcome::Vended),
            Command::Cancel => self.cancel_transaction().map(Outcome::Refunded),
        };
        self.log_result(kind, &result);
        result
    }

    pub fn insert_coin(&mut self, coin: Coin) -> Result<(), MachineError> {
        let state = mem::take(&mut self.state);
        let transition = state.insert_coin(&mut self.session, coin);
        self.commit(transition)
    }

    pub fn select_product(&mut self, shelf: &str) -> Result<(), MachineError> {
        let state = mem::take(&mut self.state);
        let transition = state.select_product(&self.session, &self.shelves, shelf);
        self.commit(transition)
    }

    /// Dispense the selected product and pay out change.
    ///
    /// The machine is back to idle afterwards whatever the outcome. When exact
    /// change cannot be made, the inserted coins are returned inside the error
    /// and nothing leaves the shelves.
    pub fn dispense_product(&mut self) -> Result<Vend, MachineError> {
        let state = mem::take(&mut self.state);
        let transition =
            state.dispense_product(&mut self.session, &mut self.shelves, &mut self.ledger);
        self.commit(transition)
    }

    /// Abort the transaction and return every inserted coin.
    pub fn cancel_transaction(&mut self) -> Result<Vec<Coin>, MachineError> {
        let state = mem::take(&mut self.state);
        let transition = state.cancel_transaction(&mut self.session);
        self.commit(transition)
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn current_state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Value of the coins inserted in the current transaction.
    pub fn balance(&self) -> Amount {
        self.session.balance()
    }

    pub fn inserted_coins(&self) -> &[Coin] {
        self.session.coins()
    }

    pub fn selected_shelf(&self) -> Option<&str> {
        self.state.selected_shelf()
    }

    pub fn shelves(&self) -> &ShelfInventory {
        &self.shelves
    }

    pub fn ledger(&self) -> &CoinLedger {
        &self.ledger
    }

    /// Shelves that currently have a product assigned, sorted by code.
    pub fn available_products(&self) -> impl Iterator<Item = (&str, &Product, u32)> + '_ {
        self.shelves
            .shelves()
            .into_iter()
            .filter_map(|shelf| Some((shelf.code(), shelf.product()?, shelf.quantity())))
    }
}

/// Admin API
impl VendingMachine {
    pub fn add_shelf(&mut self, shelf: &str) -> Result<(), MachineError> {
        Ok(self.shelves.add_shelf(shelf)?)
    }

    pub fn stock_product(
        &mut self,
        shelf: &str,
        product: Product,
        quantity: u32,
    ) -> Result<(), MachineError> {
        Ok(self.shelves.stock(shelf, product, quantity)?)
    }

    pub fn add_stock(&mut self, shelf: &str, amount: u32) -> Result<(), MachineError> {
        Ok(self.shelves.add_stock(shelf, amount)?)
    }

    /// Load coins used to make change.
    pub fn load_coins(&mut self, coin: Coin, count: u32) -> Result<(), MachineError> {
        Ok(self.ledger.add_coins(coin, count)?)
    }
}

/// Private API
impl VendingMachine {
    fn commit<T>(&mut self, transition: Transition<T>) -> Result<T, MachineError> {
        self.state = transition.next;
        transition.output
    }

    /// Small helper to log `apply` results
    fn log_result(&self, kind: &str, result: &Result<Outcome, MachineError>) {
        let state = self.state.name();
        match result {
            Ok(Outcome::Vended(vend)) => {
                info!(
                    state,
                    product = %vend.product,
                    change = %vend.change_value(),
                    coins = vend.change.len(),
                    "{kind} applied"
                );
            }
            Ok(Outcome::Refunded(coins)) => {
                info!(state, refunded = coins.len(), "{kind} applied");
            }
            Ok(Outcome::Done) => {
                info!(state, balance = %self.balance(), "{kind} applied");
            }
            Err(e) => {
                info!(
                    state,
                    balance = %self.balance(),
                    refunded = e.refund().len(),
                    reason = %e,
                    "{kind} skipped"
                );
            }
        }
    }
}
