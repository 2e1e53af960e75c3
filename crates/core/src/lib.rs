//! Core business logic for Banquet.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Report algorithms, unit arithmetic and the data source seam live here.
//!
//! # Modules
//!
//! - `ledger` - Running balances with opening/closing carry-forward
//! - `units` - Unit conversion, display precision and quantity reconciliation
//! - `locale` - Localized name fallback
//! - `gst` - Inclusive GST breakup
//! - `reports` - Report composition, assembly and rendering contract

pub mod gst;
pub mod ledger;
pub mod locale;
pub mod reports;
pub mod units;
