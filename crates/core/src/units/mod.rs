//! Measurement units and display precision.
//!
//! - `table` - static unit conversion table (base units, sub-units, factors)
//! - `precision` - decimal precision resolution per displayed value
//! - `reconcile` - base-unit summation and display-unit selection

pub mod error;
pub mod precision;
pub mod reconcile;
pub mod table;

pub use error::UnitError;
pub use precision::{AUTO_PRECISION, AUTO_PRECISION_UNIT_IDS, PrecisionPolicy, resolve_precision};
pub use reconcile::{QuantityMovement, ReconciledQuantity, UnitReconciler, reconcile_quantities};
pub use table::{MeasurementUnit, UnitTable};
