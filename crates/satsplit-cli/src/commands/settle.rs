//! Settle commands - Who pays whom to close the group out

use std::path::Path;

use colored::*;
use satsplit_clearing::MatchStrategy;
use satsplit_settlement::{display_name, EnrichedInstruction, GroupSettlement, Payability};
use satsplit_types::{Denomination, UserId};

use crate::display;
use crate::ledger_file::LedgerFile;

pub struct SettleOptions<'a> {
    pub strategy: MatchStrategy,
    pub user: Option<&'a str>,
    pub strict: bool,
    pub unit: Option<Denomination>,
    pub fallback_unit: Denomination,
    pub json: bool,
}

/// Compute and print the settlement plan for a ledger file
pub fn show_settlements(ledger_path: &Path, opts: &SettleOptions<'_>) -> anyhow::Result<()> {
    let ledger = LedgerFile::load(ledger_path)?;
    let plan = GroupSettlement::compute(&ledger.expenses, &ledger.members, opts.strategy);

    if opts.strict {
        plan.ensure_known_members()?;
    }

    let user = opts.user.map(UserId::from);
    let selected: Vec<&EnrichedInstruction> = match &user {
        Some(user) => plan.owed_by(user).collect(),
        None => plan.settlements.iter().collect(),
    };

    if opts.json {
        return match user {
            Some(_) => display::json(&selected),
            None => display::json(&plan),
        };
    }

    display::section(&format!("Settlements ({})", plan.strategy));

    if selected.is_empty() {
        match &user {
            Some(user) => display::success(&format!("{user} owes nothing")),
            None => display::success("Everyone is settled up"),
        }
    }

    for entry in &selected {
        let instr = &entry.instruction;
        let unit = opts
            .unit
            .or_else(|| entry.from.as_ref().map(|m| m.preferred_unit))
            .unwrap_or(opts.fallback_unit);

        println!(
            "  {} {} {}  {}",
            display_name(entry.from.as_ref(), &instr.from_user_id).bright_white(),
            "→".bright_black(),
            display_name(entry.to.as_ref(), &instr.to_user_id).bright_white(),
            instr.amount.format(unit).bright_yellow()
        );

        // No address validator ships with the CLI, so addresses stay unverified
        match entry.payability(None) {
            Payability::MissingAddress => display::warning("no payment address on file"),
            other => {
                if let Some(address) = other.address() {
                    display::kv("pay to", address);
                }
            }
        }
    }

    if !plan.residuals.is_empty() {
        println!();
        display::warning("Ledger does not balance; unmatched amounts:");
        for residual in &plan.residuals {
            display::kv(
                residual.user_id.as_str(),
                &residual.balance.format(opts.unit.unwrap_or(opts.fallback_unit)),
            );
        }
    }

    if user.is_none() {
        for user_id in plan.unknown_members() {
            display::warning(&format!("{user_id} is not listed in the ledger's members"));
        }
    }

    Ok(())
}
