//! Quantity reconciliation across heterogeneous units.
//!
//! Quantities are summed in base-unit space. The aggregate is then shown in
//! the base unit, or in the family's smallest sub-unit when its magnitude is
//! below one base unit (0.75 kg is shown as 750 g).

use std::sync::Arc;

use banquet_shared::types::UnitId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::UnitError;
use super::precision::PrecisionPolicy;
use super::table::UnitTable;
use crate::ledger::{BalanceSplit, Direction, SignConvention, normalize_zero};

/// One quantity movement in its recorded unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityMovement {
    /// Unsigned quantity as recorded.
    pub quantity: Decimal,
    /// Recorded unit.
    pub unit_id: UnitId,
    /// Transfer in or out.
    pub direction: Direction,
}

impl QuantityMovement {
    /// Creates a movement.
    #[must_use]
    pub const fn new(quantity: Decimal, unit_id: UnitId, direction: Direction) -> Self {
        Self {
            quantity,
            unit_id,
            direction,
        }
    }
}

/// An aggregate ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledQuantity {
    /// Aggregate expressed in `display_unit_id`.
    pub display_value: Decimal,
    /// Base unit, or the smallest sub-unit for fractional aggregates.
    pub display_unit_id: UnitId,
    /// Decimal places to show `display_value` with.
    pub precision: i32,
    /// Aggregate in base units.
    pub base_value: Decimal,
    /// Base unit of the family.
    pub base_unit_id: UnitId,
    /// Positive part of `display_value`.
    pub jama: Decimal,
    /// Magnitude of the negative part of `display_value`.
    pub udhar: Decimal,
}

/// Sums quantities and picks their display unit and precision.
#[derive(Debug, Clone)]
pub struct UnitReconciler {
    units: Arc<UnitTable>,
    precision: PrecisionPolicy,
    sign: SignConvention,
}

impl UnitReconciler {
    /// Creates a reconciler counting inflows as positive.
    #[must_use]
    pub fn new(units: Arc<UnitTable>, precision: PrecisionPolicy) -> Self {
        Self {
            units,
            precision,
            sign: SignConvention::InflowPositive,
        }
    }

    /// Uses a different sign convention.
    #[must_use]
    pub const fn with_sign(mut self, sign: SignConvention) -> Self {
        self.sign = sign;
        self
    }

    /// Base-unit magnitude of a quantity and the base unit of its family.
    ///
    /// # Errors
    ///
    /// `UnknownUnit` for units missing from the table and `FamilyMismatch`
    /// when `family` is given and `unit_id` belongs to another one.
    pub fn to_family_base(
        &self,
        quantity: Decimal,
        unit_id: UnitId,
        family: Option<UnitId>,
    ) -> Result<(Decimal, UnitId), UnitError> {
        let base_unit_id = self.units.base_unit_of(unit_id)?;
        if let Some(expected_base) = family
            && expected_base != base_unit_id
        {
            return Err(UnitError::FamilyMismatch {
                unit: unit_id,
                expected_base,
            });
        }
        Ok((self.units.to_base(quantity, unit_id)?, base_unit_id))
    }

    /// Reconciles a non-empty set of movements from a single unit family.
    ///
    /// # Errors
    ///
    /// `NoMovements` for an empty slice, `UnknownUnit` for units missing from
    /// the table and `FamilyMismatch` when the movements mix families.
    pub fn reconcile(&self, movements: &[QuantityMovement]) -> Result<ReconciledQuantity, UnitError> {
        let first = movements.first().ok_or(UnitError::NoMovements)?;
        let base_unit_id = self.units.base_unit_of(first.unit_id)?;

        let mut total = Decimal::ZERO;
        for movement in movements {
            let (base, _) =
                self.to_family_base(movement.quantity, movement.unit_id, Some(base_unit_id))?;
            total += self.sign.signed(movement.direction, base);
        }

        self.express(total, base_unit_id)
    }

    /// Expresses a base-unit aggregate in its display unit.
    ///
    /// A zero aggregate stays in the base unit.
    pub fn express(&self, base_value: Decimal, base_unit_id: UnitId) -> Result<ReconciledQuantity, UnitError> {
        let base_value = normalize_zero(base_value);
        let base_unit_id = self.units.base_unit_of(base_unit_id)?;

        let display_unit_id = if !base_value.is_zero() && base_value.abs() < Decimal::ONE {
            self.units.smallest_unit_of(base_unit_id)?
        } else {
            base_unit_id
        };

        let display_value = normalize_zero(self.units.from_base(base_value, display_unit_id)?.normalize());
        let declared = self.units.get(display_unit_id)?.declared_precision;
        let precision = self.precision.resolve(display_unit_id, declared, display_value);
        let split = BalanceSplit::of(display_value);

        Ok(ReconciledQuantity {
            display_value,
            display_unit_id,
            precision,
            base_value,
            base_unit_id,
            jama: split.jama(),
            udhar: split.udhar(),
        })
    }
}

/// Reconciles movements against the standard unit table and default precision.
pub fn reconcile_quantities(movements: &[QuantityMovement]) -> Result<ReconciledQuantity, UnitError> {
    UnitReconciler::new(Arc::new(UnitTable::standard()), PrecisionPolicy::default()).reconcile(movements)
}
