//! Unit conversion table.
//!
//! Each unit belongs to a family identified by its base unit. A unit converts
//! to its base by multiplying with `base_equivalent`; the base unit itself has
//! an equivalent of exactly 1. A family may name a smallest sub-unit used to
//! display aggregates below one base unit (kg -> g, L -> ml).

use std::collections::HashMap;

use banquet_shared::types::UnitId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::UnitError;
use super::precision::AUTO_PRECISION;
use crate::locale::LocalizedText;

/// One row of the measurement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementUnit {
    /// Unit id.
    pub id: UnitId,
    /// Display name.
    pub name: LocalizedText,
    /// Short symbol (kg, g, L).
    pub symbol: String,
    /// Base unit of this unit's family.
    pub base_unit_id: UnitId,
    /// How many base units one of this unit is worth.
    pub base_equivalent: Decimal,
    /// Finer unit used for fractional aggregates. Only read on base units.
    pub smallest_unit_id: Option<UnitId>,
    /// Declared display precision; `-1` asks for automatic precision.
    pub declared_precision: i32,
}

impl MeasurementUnit {
    /// True when this unit is the base of its family.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.id == self.base_unit_id
    }
}

/// Read-only lookup of measurement units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTable {
    units: HashMap<UnitId, MeasurementUnit>,
}

impl UnitTable {
    /// Builds a table, checking that every family is well formed.
    pub fn new(units: impl IntoIterator<Item = MeasurementUnit>) -> Result<Self, UnitError> {
        let units: HashMap<UnitId, MeasurementUnit> =
            units.into_iter().map(|unit| (unit.id, unit)).collect();

        for unit in units.values() {
            if unit.base_equivalent <= Decimal::ZERO {
                return Err(UnitError::InvalidFactor {
                    unit: unit.id,
                    factor: unit.base_equivalent,
                });
            }

            let base = units
                .get(&unit.base_unit_id)
                .ok_or(UnitError::UnknownUnit(unit.base_unit_id))?;
            if !base.is_base() || base.base_equivalent != Decimal::ONE {
                return Err(UnitError::InvalidBaseUnit {
                    unit: unit.id,
                    base: unit.base_unit_id,
                });
            }

            if unit.is_base()
                && let Some(smallest) = unit.smallest_unit_id
            {
                let sub = units
                    .get(&smallest)
                    .ok_or(UnitError::UnknownUnit(smallest))?;
                if sub.base_unit_id != unit.id {
                    return Err(UnitError::FamilyMismatch {
                        unit: smallest,
                        expected_base: unit.id,
                    });
                }
                if sub.base_equivalent >= Decimal::ONE {
                    return Err(UnitError::InvalidFactor {
                        unit: smallest,
                        factor: sub.base_equivalent,
                    });
                }
            }
        }

        Ok(Self { units })
    }

    /// The built-in table shipped with the catering schema.
    ///
    /// | id | unit | base | factor | precision |
    /// |----|------|------|--------|-----------|
    /// | 1 | kilogram | 1 | 1 | auto |
    /// | 2 | gram | 1 | 0.001 | 0 |
    /// | 3 | litre | 3 | 1 | auto |
    /// | 4 | millilitre | 3 | 0.001 | 0 |
    /// | 5 | piece | 5 | 1 | 0 |
    /// | 6 | dozen | 5 | 12 | 2 |
    /// | 7 | quintal | 1 | 100 | 3 |
    /// | 8 | tonne | 1 | 1000 | 3 |
    #[must_use]
    pub fn standard() -> Self {
        let unit = |id: i64, name: &str, symbol: &str, base: i64, factor, smallest: Option<i64>, precision| {
            MeasurementUnit {
                id: UnitId(id),
                name: LocalizedText::new(name),
                symbol: symbol.to_string(),
                base_unit_id: UnitId(base),
                base_equivalent: factor,
                smallest_unit_id: smallest.map(UnitId),
                declared_precision: precision,
            }
        };

        let units = [
            unit(1, "Kilogram", "kg", 1, Decimal::ONE, Some(2), AUTO_PRECISION),
            unit(2, "Gram", "g", 1, Decimal::new(1, 3), None, 0),
            unit(3, "Litre", "L", 3, Decimal::ONE, Some(4), AUTO_PRECISION),
            unit(4, "Millilitre", "ml", 3, Decimal::new(1, 3), None, 0),
            unit(5, "Piece", "pcs", 5, Decimal::ONE, None, 0),
            unit(6, "Dozen", "dz", 5, Decimal::from(12), None, 2),
            unit(7, "Quintal", "qtl", 1, Decimal::from(100), None, 3),
            unit(8, "Tonne", "t", 1, Decimal::from(1000), None, 3),
        ];

        Self {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    /// Looks up a unit.
    pub fn get(&self, unit_id: UnitId) -> Result<&MeasurementUnit, UnitError> {
        self.units
            .get(&unit_id)
            .ok_or(UnitError::UnknownUnit(unit_id))
    }

    /// Number of base units in one `unit_id`.
    pub fn base_unit_equivalent(&self, unit_id: UnitId) -> Result<Decimal, UnitError> {
        Ok(self.get(unit_id)?.base_equivalent)
    }

    /// True when `unit_id` is the base of its family.
    pub fn is_base_unit(&self, unit_id: UnitId) -> Result<bool, UnitError> {
        Ok(self.get(unit_id)?.is_base())
    }

    /// Base unit of the family `unit_id` belongs to.
    pub fn base_unit_of(&self, unit_id: UnitId) -> Result<UnitId, UnitError> {
        Ok(self.get(unit_id)?.base_unit_id)
    }

    /// Finest unit of the family, or the base unit when the family has none.
    pub fn smallest_unit_of(&self, unit_id: UnitId) -> Result<UnitId, UnitError> {
        let base = self.get(self.base_unit_of(unit_id)?)?;
        Ok(base.smallest_unit_id.unwrap_or(base.id))
    }

    /// Converts a quantity into its base unit.
    pub fn to_base(&self, quantity: Decimal, unit_id: UnitId) -> Result<Decimal, UnitError> {
        Ok(quantity * self.base_unit_equivalent(unit_id)?)
    }

    /// Expresses a base-unit value in `unit_id`.
    pub fn from_base(&self, base_value: Decimal, unit_id: UnitId) -> Result<Decimal, UnitError> {
        Ok(base_value / self.base_unit_equivalent(unit_id)?)
    }

    /// Number of units in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when the table holds no units.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_standard_table_is_valid() {
        let units: Vec<MeasurementUnit> = UnitTable::standard().units.into_values().collect();
        let rebuilt = UnitTable::new(units).unwrap();
        assert_eq!(rebuilt, UnitTable::standard());
        assert_eq!(rebuilt.len(), 8);
    }

    #[test]
    fn test_contract_lookups() {
        let table = UnitTable::standard();
        assert_eq!(table.base_unit_equivalent(UnitId(2)).unwrap(), dec!(0.001));
        assert_eq!(table.base_unit_equivalent(UnitId(1)).unwrap(), Decimal::ONE);
        assert!(table.is_base_unit(UnitId(1)).unwrap());
        assert!(!table.is_base_unit(UnitId(7)).unwrap());
        assert_eq!(table.base_unit_of(UnitId(8)).unwrap(), UnitId(1));
        assert_eq!(table.base_unit_of(UnitId(6)).unwrap(), UnitId(5));
        assert_eq!(table.smallest_unit_of(UnitId(7)).unwrap(), UnitId(2));
        assert_eq!(table.smallest_unit_of(UnitId(3)).unwrap(), UnitId(4));
        // Piece family has no finer unit.
        assert_eq!(table.smallest_unit_of(UnitId(6)).unwrap(), UnitId(5));
    }

    #[test]
    fn test_conversion() {
        let table = UnitTable::standard();
        assert_eq!(table.to_base(dec!(2.5), UnitId(7)).unwrap(), dec!(250));
        assert_eq!(table.to_base(dec!(750), UnitId(2)).unwrap(), dec!(0.75));
        assert_eq!(table.from_base(dec!(0.75), UnitId(2)).unwrap(), dec!(750));
        assert_eq!(table.from_base(dec!(36), UnitId(6)).unwrap(), dec!(3));
    }

    #[test]
    fn test_unknown_unit() {
        let table = UnitTable::standard();
        assert_eq!(
            table.base_unit_of(UnitId(99)),
            Err(UnitError::UnknownUnit(UnitId(99)))
        );
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        let mut units: Vec<MeasurementUnit> = UnitTable::standard().units.into_values().collect();
        for unit in &mut units {
            if unit.id == UnitId(6) {
                unit.base_equivalent = Decimal::ZERO;
            }
        }
        assert!(matches!(
            UnitTable::new(units),
            Err(UnitError::InvalidFactor { unit: UnitId(6), .. })
        ));
    }

    #[test]
    fn test_rejects_base_pointing_at_non_base() {
        let mut units: Vec<MeasurementUnit> = UnitTable::standard().units.into_values().collect();
        for unit in &mut units {
            if unit.id == UnitId(8) {
                unit.base_unit_id = UnitId(7);
            }
        }
        assert_eq!(
            UnitTable::new(units),
            Err(UnitError::InvalidBaseUnit {
                unit: UnitId(8),
                base: UnitId(7)
            })
        );
    }

    #[test]
    fn test_rejects_foreign_smallest_unit() {
        let mut units: Vec<MeasurementUnit> = UnitTable::standard().units.into_values().collect();
        for unit in &mut units {
            if unit.id == UnitId(5) {
                unit.smallest_unit_id = Some(UnitId(2));
            }
        }
        assert_eq!(
            UnitTable::new(units),
            Err(UnitError::FamilyMismatch {
                unit: UnitId(2),
                expected_base: UnitId(5)
            })
        );
    }

    #[test]
    fn test_rejects_coarser_smallest_unit() {
        let mut units: Vec<MeasurementUnit> = UnitTable::standard().units.into_values().collect();
        for unit in &mut units {
            if unit.id == UnitId(1) {
                unit.smallest_unit_id = Some(UnitId(7));
            }
        }
        assert_eq!(
            UnitTable::new(units),
            Err(UnitError::InvalidFactor {
                unit: UnitId(7),
                factor: dec!(100)
            })
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Converting to base and back returns the original quantity.
        #[test]
        fn prop_unit_round_trip(
            raw in 1i64..10_000_000i64,
            scale in 0u32..4,
            unit in 1i64..=8,
        ) {
            let table = UnitTable::standard();
            let quantity = Decimal::new(raw, scale);
            let unit = UnitId(unit);
            let base = table.to_base(quantity, unit).unwrap();
            let back = table.from_base(base, unit).unwrap();
            prop_assert_eq!(back, quantity);
        }
    }
}
