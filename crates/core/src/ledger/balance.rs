//! Balance snapshots and display splits.

use banquet_shared::types::EntityId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Replaces a negative zero with `Decimal::ZERO`.
///
/// Sums such as `-30 + 30` can leave the sign bit set on a zero value.
#[must_use]
pub fn normalize_zero(value: Decimal) -> Decimal {
    if value.is_zero() { Decimal::ZERO } else { value }
}

/// Balance of one entity at a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Ledger owner.
    pub entity_id: EntityId,
    /// Cutoff date; `None` when the window is open on that side.
    pub as_of: Option<NaiveDate>,
    /// Signed balance.
    pub balance: Decimal,
}

impl BalanceSnapshot {
    /// Debit/credit split of this balance.
    #[must_use]
    pub fn split(&self) -> BalanceSplit {
        BalanceSplit::of(self.balance)
    }
}

/// A signed value split into two non-negative columns.
///
/// Ledger reports call them debit/credit; daily activity reports call the
/// same columns jama/udhar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSplit {
    /// Positive part.
    pub debit: Decimal,
    /// Magnitude of the negative part.
    pub credit: Decimal,
}

impl BalanceSplit {
    /// Splits a signed value: `+45 -> (45, 0)`, `-45 -> (0, 45)`.
    #[must_use]
    pub fn of(value: Decimal) -> Self {
        let value = normalize_zero(value);
        if value.is_sign_negative() {
            Self {
                debit: Decimal::ZERO,
                credit: value.abs(),
            }
        } else {
            Self {
                debit: value,
                credit: Decimal::ZERO,
            }
        }
    }

    /// Inflow bucket.
    #[must_use]
    pub const fn jama(&self) -> Decimal {
        self.debit
    }

    /// Outflow bucket.
    #[must_use]
    pub const fn udhar(&self) -> Decimal {
        self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_negative_balance() {
        let split = BalanceSplit::of(dec!(-45));
        assert_eq!(split.debit, Decimal::ZERO);
        assert_eq!(split.credit, dec!(45));
    }

    #[test]
    fn test_split_positive_balance() {
        let split = BalanceSplit::of(dec!(45));
        assert_eq!(split.debit, dec!(45));
        assert_eq!(split.credit, Decimal::ZERO);
        assert_eq!(split.jama(), dec!(45));
        assert_eq!(split.udhar(), Decimal::ZERO);
    }

    #[test]
    fn test_split_zero() {
        let split = BalanceSplit::of(Decimal::ZERO);
        assert_eq!(split, BalanceSplit::default());
    }

    #[test]
    fn test_normalize_negative_zero() {
        let negative_zero = dec!(-30) + dec!(30);
        let normalized = normalize_zero(negative_zero);
        assert!(normalized.is_zero());
        assert!(!normalized.is_sign_negative());

        let mut flipped = Decimal::ZERO;
        flipped.set_sign_negative(true);
        assert!(!normalize_zero(flipped).is_sign_negative());
        assert!(!BalanceSplit::of(flipped).credit.is_sign_negative());
    }

    #[test]
    fn test_snapshot_split() {
        let snapshot = BalanceSnapshot {
            entity_id: EntityId(1),
            as_of: None,
            balance: dec!(-12.50),
        };
        assert_eq!(snapshot.split().credit, dec!(12.50));
    }
}
