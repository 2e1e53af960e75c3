//! Data source seam for report generation.
//!
//! The database crate implements [`LedgerSource`]; the composer only ever
//! sees [`SourceTransaction`]s.

use async_trait::async_trait;
use banquet_shared::types::{EntityId, TransactionId, UnitId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{EntityFilter, EntityGrouping, TransactionSource};
use crate::ledger::{Direction, Posting};
use crate::locale::LocalizedText;

/// Errors raised by a data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The query itself failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// A row could not be mapped into a transaction.
    #[error("Invalid source row: {0}")]
    InvalidRow(String),
}

/// What to fetch for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceQuery {
    /// Transaction table.
    pub source: TransactionSource,
    /// Ledger owner type.
    pub grouping: EntityGrouping,
    /// Entity or category restriction.
    pub filter: EntityFilter,
    /// Upper date bound; rows after it are never needed.
    pub until: Option<NaiveDate>,
}

/// A transaction as read from any source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTransaction {
    /// Ledger owner under the query's grouping.
    pub entity_id: EntityId,
    /// Owner name in all stored languages.
    pub entity_name: LocalizedText,
    /// Source row id.
    pub transaction_id: TransactionId,
    /// Posting date.
    pub date: NaiveDate,
    /// Inflow or outflow.
    pub direction: Direction,
    /// Unsigned amount, or quantity in `unit_id`.
    pub amount: Decimal,
    /// Measurement unit of a quantity.
    pub unit_id: Option<UnitId>,
    /// Voucher number, display only.
    pub voucher_number: Option<String>,
    /// Voucher type code.
    pub voucher_type: String,
    /// Free-text remark.
    pub remark: Option<String>,
    /// GST rate in percent, if the voucher is taxed.
    pub gst_rate: Option<Decimal>,
}

impl Posting for SourceTransaction {
    fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    fn posted_on(&self) -> NaiveDate {
        self.date
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn magnitude(&self) -> Decimal {
        self.amount
    }
}

/// Read-only access to report transactions.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Every transaction matching `query` dated on or before `query.until`.
    ///
    /// Rows before the window start are required; they form the opening
    /// balance.
    async fn fetch_transactions(
        &self,
        query: &SourceQuery,
    ) -> Result<Vec<SourceTransaction>, SourceError>;

    /// Display name for the placeholder row of an empty report.
    ///
    /// Returns `None` when the filter names nothing specific.
    async fn entity_name(
        &self,
        grouping: EntityGrouping,
        filter: &EntityFilter,
    ) -> Result<Option<LocalizedText>, SourceError>;
}
