//! Running-balance ledger engine.
//!
//! This module implements the balance carry-forward used by every report:
//! - Transaction direction and per-report sign conventions
//! - Opening/closing balance snapshots and the debit/credit split
//! - The per-entity engine (opening, in-window running balance, closing)

pub mod balance;
pub mod engine;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use balance::{BalanceSnapshot, BalanceSplit, normalize_zero};
pub use engine::{EntityLedger, LedgerEngine, LedgerEntry};
pub use types::{Direction, Posting, SignConvention};
