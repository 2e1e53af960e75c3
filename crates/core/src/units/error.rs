//! Unit error types.

use banquet_shared::types::{TransactionId, UnitId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the unit table and the quantity reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// Unit id not present in the table.
    #[error("Unknown measurement unit: {0}")]
    UnknownUnit(UnitId),

    /// Conversion factor out of range: not positive, or a smallest sub-unit
    /// that is not finer than its base.
    #[error("Unit {unit} has an invalid base equivalent {factor}")]
    InvalidFactor {
        /// Offending unit.
        unit: UnitId,
        /// Declared factor.
        factor: Decimal,
    },

    /// A base unit must map onto itself with factor 1.
    #[error("Unit {unit} declares base unit {base}, which is not a base unit")]
    InvalidBaseUnit {
        /// Offending unit.
        unit: UnitId,
        /// Declared base unit.
        base: UnitId,
    },

    /// Quantities from different unit families cannot be added.
    #[error("Unit {unit} does not belong to the {expected_base} family")]
    FamilyMismatch {
        /// Unit that was supplied.
        unit: UnitId,
        /// Base unit of the family being summed.
        expected_base: UnitId,
    },

    /// A quantity transaction carried no unit.
    #[error("Transaction {0} has a quantity but no unit")]
    MissingUnit(TransactionId),

    /// Nothing to reconcile.
    #[error("No quantities to reconcile")]
    NoMovements,
}
