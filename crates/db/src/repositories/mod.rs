//! Repository abstractions for data access.
//!
//! - `source` - the history tables behind every ledger report
//! - `measurement` - cached measurement unit table

pub mod measurement;
pub mod source;

pub use measurement::{MeasurementError, MeasurementRepository};
pub use source::{CASH_IN_HAND_ENTITY_ID, CASH_IN_HAND_NAME, LedgerSourceRepository, payment_mode};
