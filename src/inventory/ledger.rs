use std::collections::HashMap;

use crate::model::Coin;
use crate::Amount;

use super::LedgerError;

/// Coins held by the machine for making change.
#[derive(Debug, Clone)]
pub struct CoinLedger {
    counts: HashMap<Coin, u32>,
}

impl CoinLedger {
    pub fn new() -> Self {
        Self {
            counts: Coin::ALL.into_iter().map(|coin| (coin, 0)).collect(),
        }
    }

    /// Add `count` coins of one denomination. Leaves the ledger untouched on overflow.
    pub fn add_coins(&mut self, coin: Coin, count: u32) -> Result<(), LedgerError> {
        let current = self.coin_count(coin);
        let updated = current
            .checked_add(count)
            .ok_or(LedgerError::InvalidArgument(coin, count))?;
        self.counts.insert(coin, updated);
        Ok(())
    }

    pub fn coin_count(&self, coin: Coin) -> u32 {
        self.counts.get(&coin).copied().unwrap_or(0)
    }

    pub fn total_value(&self) -> Amount {
        self.counts
            .iter()
            .map(|(coin, count)| coin.value() * *count)
            .sum()
    }

    /// Counts per denomination, ascending by value.
    pub fn counts(&self) -> impl Iterator<Item = (Coin, u32)> + '_ {
        Coin::ALL
            .into_iter()
            .map(|coin| (coin, self.coin_count(coin)))
    }

    /// Take exact change for `amount` out of the ledger.
    ///
    /// Greedy, largest denomination first, computed on a snapshot of the counts.
    /// Returns `None` when the greedy pass cannot reach `amount` exactly; the
    /// ledger is then left unchanged. Greedy can miss a decomposition that
    /// exists (e.g. 30 from one quarter and three dimes), which is accepted.
    pub fn compute_change(&mut self, amount: Amount) -> Option<Vec<Coin>> {
        if amount.is_zero() {
            return Some(Vec::new());
        }

        let mut snapshot = self.counts.clone();
        let mut remaining = amount;
        let mut change = Vec::new();

        for coin in Coin::ALL.into_iter().rev() {
            let available = snapshot.entry(coin).or_insert(0);
            while *available > 0 {
                let Some(rest) = remaining.checked_sub(coin.value()) else {
                    break;
                };
                remaining = rest;
                *available -= 1;
                change.push(coin);
            }
        }

        if !remaining.is_zero() {
            return None;
        }

        // commit the whole decomposition at once
        self.counts = snapshot;
        Some(change)
    }
}

impl Default for CoinLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::coins_value;

    fn ledger(coins: &[(Coin, u32)]) -> CoinLedger {
        let mut ledger = CoinLedger::new();
        for (coin, count) in coins {
            ledger.add_coins(*coin, *count).unwrap();
        }
        ledger
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = CoinLedger::new();
        assert_eq!(ledger.total_value(), Amount::ZERO);
        for coin in Coin::ALL {
            assert_eq!(ledger.coin_count(coin), 0);
        }
    }

    #[test]
    fn add_coins_accumulates() {
        let mut ledger = CoinLedger::new();
        ledger.add_coins(Coin::Quarter, 3).unwrap();
        ledger.add_coins(Coin::Quarter, 2).unwrap();
        ledger.add_coins(Coin::Dime, 0).unwrap();
        assert_eq!(ledger.coin_count(Coin::Quarter), 5);
        assert_eq!(ledger.coin_count(Coin::Dime), 0);
    }

    #[test]
    fn add_coins_overflow_fails_and_keeps_count() {
        let mut ledger = ledger(&[(Coin::Penny, u32::MAX)]);
        let result = ledger.add_coins(Coin::Penny, 1);
        assert_eq!(result, Err(LedgerError::InvalidArgument(Coin::Penny, 1)));
        assert_eq!(ledger.coin_count(Coin::Penny), u32::MAX);
    }

    #[test]
    fn total_value_sums_all_denominations() {
        let ledger = ledger(&[(Coin::Dollar, 2), (Coin::Quarter, 3), (Coin::Penny, 4)]);
        assert_eq!(ledger.total_value(), Amount::from_cents(279));
    }

    #[test]
    fn counts_are_listed_ascending() {
        let ledger = ledger(&[(Coin::Dollar, 1), (Coin::Nickel, 2)]);
        let counts: Vec<_> = ledger.counts().collect();
        assert_eq!(
            counts,
            vec![
                (Coin::Penny, 0),
                (Coin::Nickel, 2),
                (Coin::Dime, 0),
                (Coin::Quarter, 0),
                (Coin::Dollar, 1),
            ]
        );
    }

    #[test]
    fn zero_change_is_empty_and_free() {
        let mut ledger = ledger(&[(Coin::Quarter, 1)]);
        assert_eq!(ledger.compute_change(Amount::ZERO), Some(vec![]));
        assert_eq!(ledger.coin_count(Coin::Quarter), 1);
    }

    #[test]
    fn change_uses_largest_coins_first() {
        let mut ledger = ledger(&[
            (Coin::Dollar, 5),
            (Coin::Quarter, 10),
            (Coin::Dime, 10),
            (Coin::Nickel, 10),
            (Coin::Penny, 10),
        ]);
        let change = ledger.compute_change(Amount::from_cents(141)).unwrap();
        assert_eq!(
            change,
            vec![
                Coin::Dollar,
                Coin::Quarter,
                Coin::Dime,
                Coin::Nickel,
                Coin::Penny,
            ]
        );
        assert_eq!(ledger.coin_count(Coin::Dollar), 4);
        assert_eq!(ledger.coin_count(Coin::Quarter), 9);
        assert_eq!(ledger.coin_count(Coin::Penny), 9);
    }

    #[test]
    fn change_falls_back_to_smaller_coins_when_short() {
        let mut ledger = ledger(&[(Coin::Quarter, 1), (Coin::Dime, 5)]);
        let change = ledger.compute_change(Amount::from_cents(55)).unwrap();
        assert_eq!(change, vec![Coin::Quarter, Coin::Dime, Coin::Dime, Coin::Dime]);
        assert_eq!(coins_value(&change), Amount::from_cents(55));
        assert_eq!(ledger.coin_count(Coin::Quarter), 0);
        assert_eq!(ledger.coin_count(Coin::Dime), 2);
    }

    #[test]
    fn failed_change_leaves_ledger_unchanged() {
        // quarter taken first leaves 5, only 4 pennies left
        let mut ledger = ledger(&[(Coin::Quarter, 1), (Coin::Penny, 4)]);
        assert_eq!(ledger.compute_change(Amount::from_cents(30)), None);
        assert_eq!(ledger.coin_count(Coin::Quarter), 1);
        assert_eq!(ledger.coin_count(Coin::Penny), 4);
    }

    #[test]
    fn greedy_misses_existing_decomposition() {
        let mut ledger = ledger(&[(Coin::Quarter, 1), (Coin::Dime, 3)]);
        assert_eq!(ledger.compute_change(Amount::from_cents(30)), None);
        assert_eq!(ledger.coin_count(Coin::Quarter), 1);
        assert_eq!(ledger.coin_count(Coin::Dime), 3);
    }

    #[test]
    fn empty_ledger_cannot_make_change() {
        let mut ledger = CoinLedger::new();
        assert_eq!(ledger.compute_change(Amount::from_cents(1)), None);
    }
}
