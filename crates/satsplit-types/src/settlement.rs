//! Settlement records
//!
//! A settlement record is what a caller keeps after a debtor acts on a
//! settlement instruction. It starts out pending and becomes completed once
//! the debtor attaches the on-chain transaction reference.

use crate::{Amount, Result, SatsplitError, SettlementId, SettlementInstruction, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a settlement record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Created, awaiting payment proof
    Pending,
    /// Paid, transaction reference attached
    Completed,
}

impl SettlementStatus {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// An executed (or executing) transfer between two users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub id: SettlementId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub amount: Amount,
    pub status: SettlementStatus,
    /// External transaction reference (e.g. a txid)
    pub tx_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SettlementRecord {
    /// Create a pending record
    pub fn pending(from: UserId, to: UserId, amount: Amount) -> Result<Self> {
        if !amount.is_positive() {
            return Err(SatsplitError::invalid_input(
                "amount",
                format!("settlement amount must be positive, got {amount}"),
            ));
        }
        if from == to {
            return Err(SatsplitError::invalid_input(
                "to_user_id",
                "cannot settle with yourself",
            ));
        }

        Ok(Self {
            id: SettlementId::new(),
            from_user_id: from,
            to_user_id: to,
            amount,
            status: SettlementStatus::Pending,
            tx_reference: None,
            created_at: Utc::now(),
            completed_at: None,
        })
    }

    /// Create a pending record for a proposed instruction
    pub fn from_instruction(instruction: &SettlementInstruction) -> Result<Self> {
        Self::pending(
            instruction.from_user_id.clone(),
            instruction.to_user_id.clone(),
            instruction.amount,
        )
    }

    /// Mark the record as paid
    ///
    /// Only the debtor can complete their own pending settlement.
    pub fn complete(&mut self, actor: &UserId, tx_reference: impl Into<String>) -> Result<()> {
        if actor != &self.from_user_id {
            return Err(SatsplitError::unauthorized(format!(
                "{actor} is not the payer of settlement {}",
                self.id
            )));
        }
        if self.status.is_terminal() {
            return Err(SatsplitError::SettlementAlreadyCompleted {
                settlement_id: self.id.to_string(),
            });
        }

        let tx_reference = tx_reference.into();
        if tx_reference.trim().is_empty() {
            return Err(SatsplitError::invalid_input(
                "tx_reference",
                "transaction reference must not be empty",
            ));
        }

        self.tx_reference = Some(tx_reference);
        self.status = SettlementStatus::Completed;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Whether `user` is either side of this settlement
    pub fn involves(&self, user: &UserId) -> bool {
        &self.from_user_id == user || &self.to_user_id == user
    }
}
