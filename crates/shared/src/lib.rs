//! Shared types, errors, and configuration for Banquet.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for ledger owners, transactions and measurement units
//! - Language selection and report date windows
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ReportConfig};
pub use error::AppError;
