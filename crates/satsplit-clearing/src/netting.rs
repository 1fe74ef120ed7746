//! Debtor/creditor matching
//!
//! Works on call-local copies of the balances; caller data is only read.

use crate::MatchStrategy;
use satsplit_types::{Amount, Result, SatsplitError, SettlementInstruction, UserBalance, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, warn};

/// Outcome of matching a set of balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NettingReport {
    /// Strategy used
    pub strategy: MatchStrategy,
    /// Transfers to execute, in emission order
    pub instructions: Vec<SettlementInstruction>,
    /// Balances the transfers could not extinguish (empty when conserved)
    pub residuals: Vec<UserBalance>,
    /// Users with a nonzero balance going in
    pub participants: usize,
}

impl NettingReport {
    /// Number of transfers
    pub fn transfer_count(&self) -> usize {
        self.instructions.len()
    }

    /// Whether every balance was extinguished
    pub fn is_balanced(&self) -> bool {
        self.residuals.is_empty()
    }
}

/// Working copy of one side of the book
#[derive(Debug)]
struct Position<'a> {
    /// Index in the caller's slice
    index: usize,
    user_id: &'a UserId,
    /// Outstanding magnitude; `i64::MIN` debts need the full `u64` range
    remaining: u64,
}

impl Position<'_> {
    fn residual(&self, debtor: bool) -> UserBalance {
        let sats = if debtor {
            0i64.saturating_sub_unsigned(self.remaining)
        } else {
            0i64.saturating_add_unsigned(self.remaining)
        };
        UserBalance::new(self.user_id.clone(), Amount::from_sats(sats))
    }
}

/// Emit one transfer and draw both sides down by it
fn settle_pair(debtor: &mut Position<'_>, creditor: &mut Position<'_>) -> SettlementInstruction {
    let amount = debtor.remaining.min(creditor.remaining);
    debtor.remaining -= amount;
    creditor.remaining -= amount;

    // Credits come from positive i64 balances, so the matched amount fits.
    let sats = i64::try_from(amount).unwrap_or(i64::MAX);
    SettlementInstruction {
        from_user_id: debtor.user_id.clone(),
        to_user_id: creditor.user_id.clone(),
        amount: Amount::from_sats(sats),
    }
}

/// Match debtors with creditors and report anything left over
pub fn net(balances: &[UserBalance], strategy: MatchStrategy) -> NettingReport {
    // 1. Partition into debtors and creditors, preserving input order
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();
    for (index, entry) in balances.iter().enumerate() {
        let position = Position {
            index,
            user_id: &entry.user_id,
            remaining: entry.balance.unsigned_abs(),
        };
        if entry.balance.is_negative() {
            debtors.push(position);
        } else if entry.balance.is_positive() {
            creditors.push(position);
        }
        // Zero balances carry nothing to settle
    }
    let participants = debtors.len() + creditors.len();

    // 2. Generate transfers
    let instructions = match strategy {
        MatchStrategy::FirstFit => first_fit(&mut debtors, &mut creditors),
        MatchStrategy::LargestFirst => largest_first(&mut debtors, &mut creditors),
    };

    // 3. Collect whatever could not be matched
    let mut leftovers: Vec<(usize, UserBalance)> = debtors
        .iter()
        .filter(|p| p.remaining != 0)
        .map(|p| (p.index, p.residual(true)))
        .chain(
            creditors
                .iter()
                .filter(|p| p.remaining != 0)
                .map(|p| (p.index, p.residual(false))),
        )
        .collect();
    leftovers.sort_by_key(|(index, _)| *index);
    let residuals: Vec<UserBalance> = leftovers.into_iter().map(|(_, balance)| balance).collect();

    if residuals.is_empty() {
        debug!(
            %strategy,
            participants,
            transfers = instructions.len(),
            "Matched settlement transfers"
        );
    } else {
        warn!(
            %strategy,
            participants,
            transfers = instructions.len(),
            residuals = residuals.len(),
            "Balances do not net to zero; leftover remainders were not matched"
        );
    }

    NettingReport {
        strategy,
        instructions,
        residuals,
        participants,
    }
}

/// Each debtor, in order, drains creditors in order through a shared cursor.
/// Exhausted creditors are never revisited.
fn first_fit(debtors: &mut [Position<'_>], creditors: &mut [Position<'_>]) -> Vec<SettlementInstruction> {
    let mut instructions = Vec::new();
    let mut creditor_idx = 0;

    for debtor in debtors.iter_mut() {
        while debtor.remaining != 0 && creditor_idx < creditors.len() {
            let creditor = &mut creditors[creditor_idx];
            instructions.push(settle_pair(debtor, creditor));

            if creditor.remaining == 0 {
                creditor_idx += 1;
            }
        }
    }

    instructions
}

/// Always pair the largest outstanding debt with the largest outstanding
/// credit. Equal magnitudes go to the earlier input entry.
fn largest_first(
    debtors: &mut [Position<'_>],
    creditors: &mut [Position<'_>],
) -> Vec<SettlementInstruction> {
    let mut debt_heap: BinaryHeap<(u64, Reverse<usize>)> = debtors
        .iter()
        .enumerate()
        .map(|(slot, p)| (p.remaining, Reverse(slot)))
        .collect();
    let mut credit_heap: BinaryHeap<(u64, Reverse<usize>)> = creditors
        .iter()
        .enumerate()
        .map(|(slot, p)| (p.remaining, Reverse(slot)))
        .collect();

    let mut instructions = Vec::new();

    while let (Some((_, Reverse(d))), Some((_, Reverse(c)))) = (debt_heap.pop(), credit_heap.pop()) {
        instructions.push(settle_pair(&mut debtors[d], &mut creditors[c]));

        if debtors[d].remaining != 0 {
            debt_heap.push((debtors[d].remaining, Reverse(d)));
        }
        if creditors[c].remaining != 0 {
            credit_heap.push((creditors[c].remaining, Reverse(c)));
        }
    }

    instructions
}

/// Check that balances sum to exactly zero
///
/// A nonzero sum means the ledger was not closed upstream (for example an
/// expense whose shares do not add up to its total).
pub fn verify_conservation(balances: &[UserBalance]) -> Result<()> {
    let net_sum: i128 = balances
        .iter()
        .map(|entry| i128::from(entry.balance.sats()))
        .sum();

    if net_sum == 0 {
        return Ok(());
    }

    let net_sum = i64::try_from(net_sum).unwrap_or(if net_sum > 0 { i64::MAX } else { i64::MIN });
    Err(SatsplitError::ConservationViolation { net_sum })
}
