//! SatSplit CLI - Bitcoin expense splitting from a JSON ledger
//!
//! # Quick Start
//!
//! ```bash
//! satsplit balances trip.json
//! satsplit settle trip.json --user bob --unit sats
//! satsplit convert 0.0015 --from btc --to sats
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use satsplit_clearing::MatchStrategy;
use satsplit_types::Denomination;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod display;
mod ledger_file;

use commands::{balances, convert, settle};
use config::SatsplitConfig;

/// SatSplit CLI - Who owes whom, in satoshis
#[derive(Parser)]
#[command(name = "satsplit")]
#[command(author = "SatSplit Contributors")]
#[command(version)]
#[command(about = "Split group expenses and settle up in bitcoin", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "SATSPLIT_CONFIG")]
    config: Option<PathBuf>,

    /// Display unit: sats or btc
    #[arg(short, long, global = true)]
    unit: Option<Denomination>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every member's net balance
    Balances {
        /// Ledger file (JSON)
        ledger: PathBuf,
    },

    /// Show the transfers that settle the group
    Settle {
        /// Ledger file (JSON)
        ledger: PathBuf,

        /// Matching strategy: first-fit or largest-first
        #[arg(short, long)]
        strategy: Option<MatchStrategy>,

        /// Only show what this member owes
        #[arg(long)]
        user: Option<String>,

        /// Fail if a balance belongs to someone not in the member list
        #[arg(long)]
        strict: bool,
    },

    /// Convert an amount between sats and BTC
    Convert {
        /// Amount to convert
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Unit of the input
        #[arg(long, default_value = "btc")]
        from: Denomination,

        /// Unit of the output
        #[arg(long, default_value = "sats")]
        to: Denomination,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".bright_red().bold());
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = SatsplitConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_level);

    match cli.command {
        Commands::Balances { ledger } => {
            balances::show_balances(&ledger, cli.unit, config.display_unit, cli.json)?;
        }
        Commands::Settle { ledger, strategy, user, strict } => {
            let opts = settle::SettleOptions {
                strategy: strategy.unwrap_or(config.strategy),
                user: user.as_deref(),
                strict,
                unit: cli.unit,
                fallback_unit: config.display_unit,
                json: cli.json,
            };
            settle::show_settlements(&ledger, &opts)?;
        }
        Commands::Convert { amount, from, to } => {
            convert::run_convert(&amount, from, to, cli.json)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so `--json` output stays clean
fn init_logging(fallback: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
