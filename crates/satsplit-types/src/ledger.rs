//! Ledger entries: expenses, splits, balances and settlement instructions
//!
//! All of these are value objects created per computation and owned by the
//! caller. The netting engine reads them and never keeps them.

use crate::{Amount, Result, SatsplitError, UserId};
use serde::{Deserialize, Serialize};

/// One user's share of an expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// User who owes the share
    pub user_id: UserId,
    /// Amount owed
    pub share: Amount,
}

impl Split {
    /// Create a split
    pub fn new(user_id: impl Into<UserId>, share: Amount) -> Self {
        Self {
            user_id: user_id.into(),
            share,
        }
    }
}

/// A recorded expense
///
/// The sum of the split shares is normally equal to `total`, but the engine
/// tolerates partial ledgers where it is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// User who paid
    pub payer_id: UserId,
    /// Amount paid
    pub total: Amount,
    /// Per-user shares, in the order they were recorded
    pub splits: Vec<Split>,
}

impl ExpenseRecord {
    /// Create an expense with explicit splits
    pub fn new(payer_id: impl Into<UserId>, total: Amount, splits: Vec<Split>) -> Self {
        Self {
            payer_id: payer_id.into(),
            total,
            splits,
        }
    }

    /// Sum of all split shares
    pub fn split_total(&self) -> Amount {
        self.splits.iter().map(|split| split.share).sum()
    }

    /// Check the shape a recorded expense is expected to have
    ///
    /// The total and every share must be positive and there must be at least
    /// one split. This is a caller-side check; aggregation never calls it.
    pub fn validate(&self) -> Result<()> {
        if !self.total.is_positive() {
            return Err(SatsplitError::invalid_input(
                "total",
                format!("must be positive, got {}", self.total),
            ));
        }
        if self.splits.is_empty() {
            return Err(SatsplitError::invalid_input("splits", "at least one split is required"));
        }
        if let Some(split) = self.splits.iter().find(|split| !split.share.is_positive()) {
            return Err(SatsplitError::invalid_input(
                "splits",
                format!("share for {} must be positive, got {}", split.user_id, split.share),
            ));
        }
        Ok(())
    }
}

/// A user's net position across a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    /// User
    pub user_id: UserId,
    /// Net amount (positive = owed money, negative = owes money)
    pub balance: Amount,
}

impl UserBalance {
    /// Create a balance entry
    pub fn new(user_id: impl Into<UserId>, balance: Amount) -> Self {
        Self {
            user_id: user_id.into(),
            balance,
        }
    }

    /// Whether this user owes money
    pub fn is_debtor(&self) -> bool {
        self.balance.is_negative()
    }

    /// Whether this user is owed money
    pub fn is_creditor(&self) -> bool {
        self.balance.is_positive()
    }
}

/// A proposed, not yet executed, transfer from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    /// Debtor
    pub from_user_id: UserId,
    /// Creditor
    pub to_user_id: UserId,
    /// Amount to transfer (always positive)
    pub amount: Amount,
}

impl SettlementInstruction {
    /// Create an instruction
    pub fn new(from: impl Into<UserId>, to: impl Into<UserId>, amount: Amount) -> Self {
        Self {
            from_user_id: from.into(),
            to_user_id: to.into(),
            amount,
        }
    }
}
