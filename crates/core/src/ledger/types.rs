//! Ledger domain types.

use banquet_shared::types::TransactionId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a posted transaction.
///
/// Stored as `transaction_type` (account history) or `transfer_type`
/// (stock, crockery, general fix): `0` is inflow, `1` is outflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Debit side / transfer in.
    Inflow,
    /// Credit side / transfer out.
    Outflow,
}

impl Direction {
    /// Decodes the stored `0`/`1` flag.
    #[must_use]
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Inflow),
            1 => Some(Self::Outflow),
            _ => None,
        }
    }

    /// Stored flag for this direction.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Self::Inflow => 0,
            Self::Outflow => 1,
        }
    }
}

/// How a transaction direction contributes to a running balance.
///
/// Contact ledgers count what the contact owes (inflow adds); cash and bank
/// books count money in hand, so a receipt from a contact (outflow on the
/// contact side) adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// Inflow `+`, outflow `-`.
    InflowPositive,
    /// Outflow `+`, inflow `-`.
    OutflowPositive,
}

impl SignConvention {
    /// Signed contribution of a non-negative magnitude.
    #[must_use]
    pub fn signed(self, direction: Direction, magnitude: Decimal) -> Decimal {
        match (self, direction) {
            (Self::InflowPositive, Direction::Inflow)
            | (Self::OutflowPositive, Direction::Outflow) => magnitude,
            (Self::InflowPositive, Direction::Outflow)
            | (Self::OutflowPositive, Direction::Inflow) => -magnitude,
        }
    }
}

/// Anything the engine can place in a ledger.
///
/// `magnitude` must already be expressed in the ledger's summation unit
/// (currency, or the base unit of a quantity family).
pub trait Posting {
    /// Tie-breaker for transactions on the same date.
    fn transaction_id(&self) -> TransactionId;
    /// Posting date; the ordering key.
    fn posted_on(&self) -> NaiveDate;
    /// Inflow or outflow.
    fn direction(&self) -> Direction;
    /// Unsigned amount in summation units.
    fn magnitude(&self) -> Decimal;
}
