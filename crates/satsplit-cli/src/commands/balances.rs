//! Balance commands - Net position of every group member

use std::path::Path;

use colored::*;
use satsplit_clearing::MatchStrategy;
use satsplit_settlement::{display_name, GroupSettlement};
use satsplit_types::{Amount, Denomination};

use crate::display;
use crate::ledger_file::LedgerFile;

/// Show net balances for a ledger file
pub fn show_balances(
    ledger_path: &Path,
    unit: Option<Denomination>,
    fallback: Denomination,
    json: bool,
) -> anyhow::Result<()> {
    let ledger = LedgerFile::load(ledger_path)?;
    let plan = GroupSettlement::compute(&ledger.expenses, &ledger.members, MatchStrategy::default());

    if json {
        return display::json(&plan.balances);
    }

    display::section("Balances");
    if plan.is_settled() {
        display::success("Everyone is settled up");
        return Ok(());
    }

    for entry in &plan.balances {
        let member = entry.member.as_ref();
        let name = display_name(member, &entry.balance.user_id);
        let unit = unit
            .or_else(|| member.map(|m| m.preferred_unit))
            .unwrap_or(fallback);
        let (state, text) = describe(entry.balance.balance, unit);
        let text = if entry.balance.is_creditor() {
            text.bright_green()
        } else {
            text.bright_red()
        };

        println!("  {:<20} {:<8} {}", name.bright_white(), state, text);
    }

    for user_id in plan.unknown_members() {
        display::warning(&format!("{user_id} is not listed in the ledger's members"));
    }

    Ok(())
}

/// Verb and unsigned amount for one balance line
fn describe(balance: Amount, unit: Denomination) -> (&'static str, String) {
    let state = if balance.is_negative() { "owes" } else { "is owed" };
    (state, balance.abs().format(unit))
}
