//! Error types for the vending machine.

use std::fmt;

use thiserror::Error;

use crate::Amount;
use crate::inventory::{LedgerError, ShelfError};
use crate::model::{Coin, ShelfCode};

/// Customer-facing operations of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InsertCoin,
    SelectProduct,
    DispenseProduct,
    CancelTransaction,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::InsertCoin => "insert coin",
            Operation::SelectProduct => "select product",
            Operation::DispenseProduct => "dispense product",
            Operation::CancelTransaction => "cancel transaction",
        })
    }
}

/// Error returned by every [`VendingMachine`](super::VendingMachine) operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("cannot {operation} in state {state}: {hint}")]
    InvalidOperation {
        operation: Operation,
        state: &'static str,
        hint: &'static str,
    },

    #[error("product at shelf {0} is not available")]
    NotAvailable(ShelfCode),

    #[error("insufficient money: required {required}, provided {provided}")]
    InsufficientMoney { required: Amount, provided: Amount },

    #[error("cannot make exact change for {amount}; {n} coin(s) refunded", n = .refund.len())]
    InsufficientChange { amount: Amount, refund: Vec<Coin> },

    /// The selection stopped being valid between selection and dispense.
    #[error("sale from shelf {shelf} aborted; {n} coin(s) refunded", n = .refund.len())]
    Aborted {
        shelf: ShelfCode,
        refund: Vec<Coin>,
        #[source]
        reason: Box<MachineError>,
    },

    #[error(transparent)]
    Shelf(#[from] ShelfError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl MachineError {
    /// Missing amount for an [`InsufficientMoney`](MachineError::InsufficientMoney) error.
    pub fn shortage(&self) -> Option<Amount> {
        match self {
            MachineError::InsufficientMoney { required, provided } => {
                required.checked_sub(*provided)
            }
            _ => None,
        }
    }

    /// Coins handed back to the customer as part of the failure, if any.
    pub fn refund(&self) -> &[Coin] {
        match self {
            MachineError::InsufficientChange { refund, .. }
            | MachineError::Aborted { refund, .. } => refund,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortage_of_insufficient_money() {
        let err = MachineError::InsufficientMoney {
            required: Amount::from_cents(150),
            provided: Amount::from_cents(50),
        };
        assert_eq!(err.shortage(), Some(Amount::from_cents(100)));
        assert_eq!(MachineError::NotAvailable("A1".into()).shortage(), None);
    }

    #[test]
    fn messages() {
        let err = MachineError::InvalidOperation {
            operation: Operation::SelectProduct,
            state: "IDLE",
            hint: "insert coins first",
        };
        assert_eq!(
            err.to_string(),
            "cannot select product in state IDLE: insert coins first"
        );

        let err = MachineError::InsufficientChange {
            amount: Amount::from_cents(30),
            refund: vec![Coin::Dollar, Coin::Dollar],
        };
        assert_eq!(
            err.to_string(),
            "cannot make exact change for $0.30; 2 coin(s) refunded"
        );
        assert_eq!(err.refund(), &[Coin::Dollar, Coin::Dollar]);
    }
}
