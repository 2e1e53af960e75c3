//! Decimal precision resolution.
//!
//! A unit declares how many decimal places its values display with. The
//! declared value `-1` on an auto-precision unit means "decide per value":
//! integral values show no decimals, fractional values show three (the
//! gram/millilitre resolution of a kg/L quantity). Resolution happens for
//! every displayed value, so two rows in the same unit may differ.

use std::collections::BTreeSet;

use banquet_shared::types::UnitId;
use rust_decimal::Decimal;

/// Declared precision that requests automatic resolution.
pub const AUTO_PRECISION: i32 = -1;

/// Units that honour [`AUTO_PRECISION`] (kilogram and litre in the standard table).
pub const AUTO_PRECISION_UNIT_IDS: [UnitId; 2] = [UnitId(1), UnitId(3)];

/// Digits shown for a fractional value of an auto-precision unit.
const FRACTIONAL_DIGITS: i32 = 3;

/// Which units use automatic precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionPolicy {
    auto_units: BTreeSet<UnitId>,
}

impl PrecisionPolicy {
    /// Creates a policy with the given auto-precision units.
    #[must_use]
    pub fn new(auto_units: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            auto_units: auto_units.into_iter().collect(),
        }
    }

    /// True when `unit_id` resolves `-1` automatically.
    #[must_use]
    pub fn is_auto_unit(&self, unit_id: UnitId) -> bool {
        self.auto_units.contains(&unit_id)
    }

    /// Resolves the number of decimal places for one displayed value.
    ///
    /// Any declared precision other than `-1` on an auto unit is returned
    /// unchanged.
    #[must_use]
    pub fn resolve(&self, unit_id: UnitId, declared_precision: i32, value: Decimal) -> i32 {
        if declared_precision == AUTO_PRECISION && self.is_auto_unit(unit_id) {
            if value.fract().is_zero() {
                0
            } else {
                FRACTIONAL_DIGITS
            }
        } else {
            declared_precision
        }
    }
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        Self::new(AUTO_PRECISION_UNIT_IDS)
    }
}

/// Resolves precision with the default auto-precision units.
#[must_use]
pub fn resolve_precision(unit_id: UnitId, declared_precision: i32, value: Decimal) -> i32 {
    PrecisionPolicy::default().resolve(unit_id, declared_precision, value)
}
