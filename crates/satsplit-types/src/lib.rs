//! SatSplit Types - Canonical value types for the shared-expense ledger
//!
//! This crate contains the foundational types for SatSplit with zero
//! dependencies on other satsplit crates. It defines:
//!
//! - Identity types (UserId, SettlementId)
//! - Fixed-point satoshi amounts and display denominations
//! - Ledger entries (expenses, splits, balances, settlement instructions)
//! - Settlement records with their pending → completed lifecycle
//!
//! # Invariants
//!
//! 1. Amounts are integer satoshis; floating point never enters the core
//! 2. Σ balance over a closed ledger is exactly zero
//! 3. Every settlement instruction moves a strictly positive amount

pub mod identity;
pub mod amount;
pub mod denomination;
pub mod ledger;
pub mod settlement;
pub mod error;

pub use identity::*;
pub use amount::*;
pub use denomination::*;
pub use ledger::*;
pub use settlement::*;
pub use error::*;
