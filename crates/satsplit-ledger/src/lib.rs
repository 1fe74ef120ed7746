//! SatSplit Ledger - Reduces recorded expenses to net balances
//!
//! The aggregator is:
//! - Call-scoped (a fresh accumulation map per computation, no global state)
//! - Order-preserving (users are reported in first-seen order)
//! - Exact (integer satoshis, so "settled" means exactly zero)
//!
//! # Invariants
//!
//! 1. Each expense credits its payer by the total and debits each split user
//!    by their share
//! 2. Users with a zero net balance are omitted
//! 3. When shares sum to totals, the reported balances sum to zero
//!
//! Running totals are kept in `i128`, so no sequence of valid expenses can
//! overflow mid-aggregation. A final balance outside the `i64` range is
//! clamped and logged; the clamped ledger then fails conservation downstream.

use indexmap::IndexMap;
use satsplit_types::{Amount, ExpenseRecord, UserBalance, UserId};
use tracing::{debug, warn};

pub mod split;

pub use split::{equal_split_expense, split_equally};

/// Running net positions for one aggregation
#[derive(Debug, Clone, Default)]
pub struct BalanceAggregator {
    balances: IndexMap<UserId, i128>,
}

impl BalanceAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit a user
    pub fn credit(&mut self, user: &UserId, amount: Amount) {
        *self.entry(user) += i128::from(amount.sats());
    }

    /// Debit a user
    pub fn debit(&mut self, user: &UserId, amount: Amount) {
        *self.entry(user) -= i128::from(amount.sats());
    }

    /// Apply one expense: the payer is credited, every split user debited
    ///
    /// A payer who also holds a split is both credited and debited.
    pub fn record(&mut self, expense: &ExpenseRecord) {
        self.credit(&expense.payer_id, expense.total);
        for split in &expense.splits {
            self.debit(&split.user_id, split.share);
        }
    }

    /// Current balance of a user (zero if never referenced)
    pub fn balance_of(&self, user: &UserId) -> Amount {
        self.balances
            .get(user)
            .copied()
            .map(Amount::saturating_from_i128)
            .unwrap_or_default()
    }

    /// Number of users referenced so far, settled ones included
    pub fn participants(&self) -> usize {
        self.balances.len()
    }

    /// Consume the aggregator, keeping only unsettled users
    pub fn into_balances(self) -> Vec<UserBalance> {
        self.balances
            .into_iter()
            .filter(|(_, balance)| *balance != 0)
            .map(|(user_id, balance)| {
                let clamped = Amount::saturating_from_i128(balance);
                if i128::from(clamped.sats()) != balance {
                    warn!(%user_id, balance = %balance, "Net balance exceeds the amount range; clamped");
                }
                UserBalance { user_id, balance: clamped }
            })
            .collect()
    }

    fn entry(&mut self, user: &UserId) -> &mut i128 {
        self.balances.entry(user.clone()).or_insert(0)
    }
}

/// Compute each user's net balance across `expenses`
///
/// Balances are emitted in the order users first appear (payer before splits
/// within an expense). Settled users are left out.
pub fn aggregate(expenses: &[ExpenseRecord]) -> Vec<UserBalance> {
    let mut aggregator = BalanceAggregator::new();
    for expense in expenses {
        aggregator.record(expense);
    }

    let participants = aggregator.participants();
    let balances = aggregator.into_balances();
    debug!(
        expenses = expenses.len(),
        participants,
        unsettled = balances.len(),
        "Aggregated ledger balances"
    );
    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use satsplit_types::Split;

    fn sats(v: i64) -> Amount {
        Amount::from_sats(v)
    }

    fn expense(payer: &str, total: i64, splits: &[(&str, i64)]) -> ExpenseRecord {
        ExpenseRecord::new(
            payer,
            sats(total),
            splits.iter().map(|(user, share)| Split::new(*user, sats(*share))).collect(),
        )
    }

    #[test]
    fn test_single_expense_three_ways() {
        let balances = aggregate(&[expense("a", 300, &[("a", 100), ("b", 100), ("c", 100)])]);
        assert_eq!(
            balances,
            vec![
                UserBalance::new("a", sats(200)),
                UserBalance::new("b", sats(-100)),
                UserBalance::new("c", sats(-100)),
            ]
        );
    }

    #[test]
    fn test_mutual_expenses_cancel() {
        let balances = aggregate(&[
            expense("a", 100, &[("a", 50), ("b", 50)]),
            expense("b", 100, &[("a", 50), ("b", 50)]),
        ]);
        assert!(balances.is_empty());
    }

    #[test]
    fn test_empty_ledger() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_self_share_nets_to_zero() {
        let balances = aggregate(&[expense("a", 500, &[("a", 500)])]);
        assert!(balances.is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let balances = aggregate(&[
            expense("c", 10, &[("b", 10)]),
            expense("a", 20, &[("c", 20)]),
        ]);
        let order: Vec<&str> = balances.iter().map(|b| b.user_id.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_partial_ledger_is_tolerated() {
        // Shares cover only part of the total.
        let balances = aggregate(&[expense("a", 100, &[("b", 60)])]);
        assert_eq!(
            balances,
            vec![UserBalance::new("a", sats(100)), UserBalance::new("b", sats(-60))]
        );
    }

    #[test]
    fn test_one_satoshi_is_not_settled() {
        let balances = aggregate(&[expense("a", 1, &[("b", 1)])]);
        assert_eq!(balances.len(), 2);
    }

    #[test]
    fn test_aggregator_tracks_settled_participants() {
        let mut aggregator = BalanceAggregator::new();
        aggregator.record(&expense("a", 50, &[("b", 50)]));
        aggregator.record(&expense("b", 50, &[("a", 50)]));

        assert_eq!(aggregator.participants(), 2);
        assert_eq!(aggregator.balance_of(&UserId::from("a")), Amount::ZERO);
        assert_eq!(aggregator.balance_of(&UserId::from("zed")), Amount::ZERO);
        assert!(aggregator.into_balances().is_empty());
    }

    #[test]
    fn test_huge_expenses_do_not_overflow() {
        let half = i64::MAX / 2 + 1;
        let big = expense("a", half, &[("b", half)]);
        assert!(big.validate().is_ok());

        let balances = aggregate(&[big.clone(), big]);
        // a is owed 2^63, one past i64::MAX; b owes exactly i64::MIN.
        assert_eq!(
            balances,
            vec![UserBalance::new("a", sats(i64::MAX)), UserBalance::new("b", sats(i64::MIN))]
        );
    }

    #[test]
    fn test_intermediate_overflow_nets_out_exactly() {
        let mut aggregator = BalanceAggregator::new();
        aggregator.record(&expense("a", i64::MAX, &[("b", i64::MAX)]));
        aggregator.record(&expense("a", i64::MAX, &[("b", i64::MAX)]));
        aggregator.record(&expense("b", i64::MAX, &[("a", i64::MAX)]));

        assert_eq!(aggregator.balance_of(&UserId::from("a")), sats(i64::MAX));
        assert_eq!(aggregator.balance_of(&UserId::from("b")), sats(-i64::MAX));
    }
}
