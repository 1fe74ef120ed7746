//! SatSplit Clearing - Turns net balances into pairwise settlement transfers
//!
//! The matcher pairs debtors with creditors until every balance is
//! extinguished. Two strategies are available:
//! 1. First-fit - debtors and creditors are matched in input order (default)
//! 2. Largest-first - the largest outstanding debt is always matched against
//!    the largest outstanding credit
//!
//! Neither strategy guarantees the minimum possible number of transfers.

use satsplit_types::{SatsplitError, SettlementInstruction, UserBalance};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod netting;

pub use netting::{net, verify_conservation, NettingReport};

/// How debtors are paired with creditors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStrategy {
    /// Walk debtors in input order, each draining creditors in input order.
    /// Pairings depend only on the order balances are supplied in.
    #[default]
    FirstFit,
    /// Repeatedly match the largest remaining debtor with the largest
    /// remaining creditor, ties broken by input order.
    LargestFirst,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first-fit",
            Self::LargestFirst => "largest-first",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = SatsplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "legacy" => Ok(Self::FirstFit),
            "largest-first" | "largestfirst" | "sorted" => Ok(Self::LargestFirst),
            other => Err(SatsplitError::invalid_input(
                "strategy",
                format!("unknown strategy '{other}', expected 'first-fit' or 'largest-first'"),
            )),
        }
    }
}

/// Settlement matcher configured with a strategy
///
/// Holds no state between calls; every call builds its own working copies of
/// the balances it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettlementMatcher {
    strategy: MatchStrategy,
}

impl SettlementMatcher {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Produce transfers that extinguish `balances`
    pub fn match_balances(&self, balances: &[UserBalance]) -> Vec<SettlementInstruction> {
        net(balances, self.strategy).instructions
    }
}

/// Produce first-fit transfers that extinguish `balances`
///
/// Every emitted amount is positive. When the balances sum to zero, the
/// transfers out of each debtor add up to its debt and the transfers into each
/// creditor add up to its credit. Remainders left by non-conserved input are
/// dropped; use [`net`] to see them.
pub fn match_balances(balances: &[UserBalance]) -> Vec<SettlementInstruction> {
    SettlementMatcher::default().match_balances(balances)
}
