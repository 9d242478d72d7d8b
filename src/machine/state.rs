//! Transaction states and the transitions between them.
//!
//! Each transition consumes the current [`MachineState`], works on the
//! session and inventories it is handed, and yields the next state together
//! with the operation's output. Rejected operations hand back the state they
//! were given and leave everything else untouched.

use std::mem;

use crate::Amount;
use crate::inventory::{CoinLedger, ShelfInventory};
use crate::model::{Coin, Product, ShelfCode, coins_value};

use super::{MachineError, Operation};

/// Where the machine is in a customer transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MachineState {
    /// No coins inserted.
    #[default]
    Idle,
    /// Coins inserted, nothing selected yet.
    HasMoney,
    /// A shelf was selected and paid for; waiting for dispense.
    Dispensing { shelf: ShelfCode },
}

impl MachineState {
    pub fn name(&self) -> &'static str {
        match self {
            MachineState::Idle => "IDLE",
            MachineState::HasMoney => "HAS_MONEY",
            MachineState::Dispensing { .. } => "DISPENSING",
        }
    }

    pub fn selected_shelf(&self) -> Option<&str> {
        match self {
            MachineState::Dispensing { shelf } => Some(shelf),
            _ => None,
        }
    }

    fn reject<T>(self, operation: Operation, hint: &'static str) -> Transition<T> {
        let err = MachineError::InvalidOperation {
            operation,
            state: self.name(),
            hint,
        };
        Transition::fail(self, err)
    }

    pub(super) fn insert_coin(self, session: &mut Session, coin: Coin) -> Transition<()> {
        match self {
            MachineState::Idle | MachineState::HasMoney => {
                session.coins.push(coin);
                Transition::ok(MachineState::HasMoney, ())
            }
            MachineState::Dispensing { .. } => {
                self.reject(Operation::InsertCoin, "product is being dispensed, please wait")
            }
        }
    }

    pub(super) fn select_product(
        self,
        session: &Session,
        shelves: &ShelfInventory,
        code: &str,
    ) -> Transition<()> {
        match self {
            MachineState::Idle => self.reject(Operation::SelectProduct, "insert coins first"),
            MachineState::HasMoney => {
                if let Err(err) = check_purchase(shelves, code, session.balance()) {
                    return Transition::fail(self, err);
                }
                let next = MachineState::Dispensing {
                    shelf: code.to_string(),
                };
                Transition::ok(next, ())
            }
            MachineState::Dispensing { .. } => {
                self.reject(Operation::SelectProduct, "product already selected")
            }
        }
    }

    pub(super) fn dispense_product(
        self,
        session: &mut Session,
        shelves: &mut ShelfInventory,
        ledger: &mut CoinLedger,
    ) -> Transition<Vend> {
        match self {
            MachineState::Idle => {
                self.reject(Operation::DispenseProduct, "insert coins and select first")
            }
            MachineState::HasMoney => {
                self.reject(Operation::DispenseProduct, "select a product first")
            }
            MachineState::Dispensing { shelf } => {
                let output = dispense(&shelf, session, shelves, ledger);
                Transition {
                    next: MachineState::Idle,
                    output,
                }
            }
        }
    }

    pub(super) fn cancel_transaction(self, session: &mut Session) -> Transition<Vec<Coin>> {
        match self {
            MachineState::Idle => Transition::ok(MachineState::Idle, Vec::new()),
            MachineState::HasMoney => Transition::ok(MachineState::Idle, session.take()),
            MachineState::Dispensing { .. } => {
                self.reject(Operation::CancelTransaction, "cannot cancel while dispensing")
            }
        }
    }
}

/// Next state plus the result of the operation that produced it.
#[must_use]
#[derive(Debug)]
pub(super) struct Transition<T> {
    pub(super) next: MachineState,
    pub(super) output: Result<T, MachineError>,
}

impl<T> Transition<T> {
    fn ok(next: MachineState, value: T) -> Self {
        Self {
            next,
            output: Ok(value),
        }
    }

    fn fail(next: MachineState, err: MachineError) -> Self {
        Self {
            next,
            output: Err(err),
        }
    }
}

/// Coins inserted during the current transaction.
#[derive(Debug, Clone, Default)]
pub struct Session {
    coins: Vec<Coin>,
}

impl Session {
    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn balance(&self) -> Amount {
        coins_value(&self.coins)
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Empty the session, handing back the coins.
    fn take(&mut self) -> Vec<Coin> {
        mem::take(&mut self.coins)
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vend {
    pub product: Product,
    pub change: Vec<Coin>,
}

impl Vend {
    pub fn change_value(&self) -> Amount {
        coins_value(&self.change)
    }
}

/// Ensure the shelf can be sold from with the given balance; returns its product.
fn check_purchase<'a>(
    shelves: &'a ShelfInventory,
    code: &str,
    balance: Amount,
) -> Result<&'a Product, MachineError> {
    if !shelves.is_available(code) {
        return Err(MachineError::NotAvailable(code.to_string()));
    }
    let product = shelves
        .product(code)
        .map_err(|_| MachineError::NotAvailable(code.to_string()))?;
    if balance < product.price() {
        return Err(MachineError::InsufficientMoney {
            required: product.price(),
            provided: balance,
        });
    }
    Ok(product)
}

/// Sell from `shelf`: pay out change, absorb the inserted coins, take one unit.
///
/// All-or-nothing. Ledger changes are staged on a copy and only committed once
/// the shelf has been decremented; any failure refunds the whole session.
fn dispense(
    shelf: &str,
    session: &mut Session,
    shelves: &mut ShelfInventory,
    ledger: &mut CoinLedger,
) -> Result<Vend, MachineError> {
    let aborted = |session: &mut Session, reason: MachineError| MachineError::Aborted {
        shelf: shelf.to_string(),
        refund: session.take(),
        reason: Box::new(reason),
    };

    let balance = session.balance();
    let price = match check_purchase(shelves, shelf, balance) {
        Ok(product) => product.price(),
        Err(reason) => return Err(aborted(session, reason)),
    };
    let change_amount = balance.checked_sub(price).unwrap_or(Amount::ZERO);

    let mut staged = ledger.clone();
    let Some(change) = staged.compute_change(change_amount) else {
        return Err(MachineError::InsufficientChange {
            amount: change_amount,
            refund: session.take(),
        });
    };

    let absorbed = session
        .coins()
        .iter()
        .try_for_each(|coin| staged.add_coins(*coin, 1));
    if let Err(err) = absorbed {
        return Err(aborted(session, err.into()));
    }

    let product = match shelves.dispense(shelf) {
        Ok(product) => product,
        Err(err) => return Err(aborted(session, err.into())),
    };

    *ledger = staged;
    session.take();
    Ok(Vend { product, change })
}
