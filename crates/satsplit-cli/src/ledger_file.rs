//! JSON ledger files
//!
//! ```json
//! {
//!   "members": [{ "user_id": "alice", "username": "Alice", "payment_address": "bc1q..." }],
//!   "expenses": [{ "payer_id": "alice", "total": 300, "splits": [{ "user_id": "bob", "share": 300 }] }]
//! }
//! ```
//!
//! Amounts are integer satoshis.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use satsplit_settlement::Member;
use satsplit_types::ExpenseRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFile {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl LedgerFile {
    /// Read and validate a ledger file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read ledger {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid ledger {}", path.display()))
    }

    /// Parse and validate ledger JSON
    pub fn from_json(text: &str) -> Result<Self> {
        let ledger: Self = serde_json::from_str(text).context("malformed ledger JSON")?;
        for (idx, expense) in ledger.expenses.iter().enumerate() {
            expense
                .validate()
                .with_context(|| format!("expense #{} paid by {}", idx + 1, expense.payer_id))?;
        }
        tracing::debug!(
            members = ledger.members.len(),
            expenses = ledger.expenses.len(),
            "Loaded ledger"
        );
        Ok(ledger)
    }
}
