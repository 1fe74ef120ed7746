//! SatSplit Settlement - Group settlement plans
//!
//! Composes the aggregator and the matcher for one group, then joins the
//! results with member data so they can be presented: who owes whom, in which
//! unit they prefer to see it, and whether the creditor can be paid.
//!
//! Executed transfers become [`SettlementRecord`]s which the caller persists.

use std::collections::HashMap;

use satsplit_clearing::{net, MatchStrategy};
use satsplit_ledger::aggregate;
use satsplit_types::{
    Denomination, ExpenseRecord, Result, SatsplitError, SettlementInstruction, SettlementRecord,
    UserBalance, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod payability;

pub use payability::{AddressValidator, Payability};
pub use satsplit_types::SettlementStatus;

/// Group member as known to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub username: String,
    /// Where this member receives payments
    #[serde(default)]
    pub payment_address: Option<String>,
    /// Unit this member prefers to see amounts in
    #[serde(default)]
    pub preferred_unit: Denomination,
}

impl Member {
    pub fn new(user_id: impl Into<UserId>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            payment_address: None,
            preferred_unit: Denomination::default(),
        }
    }

    pub fn with_payment_address(mut self, address: impl Into<String>) -> Self {
        self.payment_address = Some(address.into());
        self
    }

    pub fn with_preferred_unit(mut self, unit: Denomination) -> Self {
        self.preferred_unit = unit;
        self
    }
}

/// Member's username, or the raw id when the member is unknown
pub fn display_name(member: Option<&Member>, user_id: &UserId) -> String {
    member
        .map(|m| m.username.clone())
        .unwrap_or_else(|| user_id.to_string())
}

/// A net balance joined with its member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedBalance {
    #[serde(flatten)]
    pub balance: UserBalance,
    pub member: Option<Member>,
}

/// A settlement instruction joined with both members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedInstruction {
    #[serde(flatten)]
    pub instruction: SettlementInstruction,
    pub from: Option<Member>,
    pub to: Option<Member>,
}

impl EnrichedInstruction {
    /// Whether the creditor can be paid right now
    pub fn payability(&self, validator: Option<&dyn AddressValidator>) -> Payability {
        let address = self.to.as_ref().and_then(|m| m.payment_address.as_deref());
        Payability::assess(address, validator)
    }

    /// Turn this proposal into a pending settlement record
    pub fn to_pending_record(&self) -> Result<SettlementRecord> {
        SettlementRecord::from_instruction(&self.instruction)
    }
}

/// Balances and transfers for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettlement {
    pub strategy: MatchStrategy,
    pub balances: Vec<EnrichedBalance>,
    pub settlements: Vec<EnrichedInstruction>,
    /// Remainders the matcher could not place (empty for a closed ledger)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub residuals: Vec<UserBalance>,
}

impl GroupSettlement {
    /// Compute balances and settlement transfers for a group's expenses
    pub fn compute(expenses: &[ExpenseRecord], members: &[Member], strategy: MatchStrategy) -> Self {
        let directory: HashMap<&UserId, &Member> =
            members.iter().map(|member| (&member.user_id, member)).collect();
        let lookup = |user: &UserId| directory.get(user).map(|member| (*member).clone());

        let balances = aggregate(expenses);
        let report = net(&balances, strategy);

        let settlements: Vec<EnrichedInstruction> = report
            .instructions
            .into_iter()
            .map(|instruction| EnrichedInstruction {
                from: lookup(&instruction.from_user_id),
                to: lookup(&instruction.to_user_id),
                instruction,
            })
            .collect();

        let balances: Vec<EnrichedBalance> = balances
            .into_iter()
            .map(|balance| EnrichedBalance {
                member: lookup(&balance.user_id),
                balance,
            })
            .collect();

        info!(
            expenses = expenses.len(),
            members = members.len(),
            balances = balances.len(),
            settlements = settlements.len(),
            %strategy,
            "Computed group settlement"
        );

        Self {
            strategy,
            balances,
            settlements,
            residuals: report.residuals,
        }
    }

    /// Transfers `user` has to make
    pub fn owed_by<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a EnrichedInstruction> + 'a {
        self.settlements
            .iter()
            .filter(move |s| &s.instruction.from_user_id == user)
    }

    /// Transfers `user` is due to receive
    pub fn owed_to<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a EnrichedInstruction> + 'a {
        self.settlements
            .iter()
            .filter(move |s| &s.instruction.to_user_id == user)
    }

    /// Participants with a balance who are missing from the member list
    pub fn unknown_members(&self) -> Vec<&UserId> {
        self.balances
            .iter()
            .filter(|entry| entry.member.is_none())
            .map(|entry| &entry.balance.user_id)
            .collect()
    }

    /// Fail on the first participant missing from the member list
    pub fn ensure_known_members(&self) -> Result<()> {
        match self.unknown_members().first() {
            Some(user_id) => {
                debug!(%user_id, "Settlement references a non-member");
                Err(SatsplitError::UnknownMember {
                    user_id: user_id.to_string(),
                })
            }
            None => Ok(()),
        }
    }

    /// Whether nothing is owed by anyone
    pub fn is_settled(&self) -> bool {
        self.balances.is_empty()
    }
}
