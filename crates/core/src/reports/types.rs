//! Report data types.

use std::fmt;
use std::str::FromStr;

use banquet_shared::types::{
    CategoryId, DateWindow, EntityId, LanguageSelector, TransactionId, UnitId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::gst::GstBreakup;
use crate::ledger::{Direction, SignConvention};

/// Filter id meaning "include every entity".
pub const NO_FILTER_SENTINEL: i64 = 0;

/// Voucher type of the synthetic opening row and of the empty-report placeholder.
pub const OPENING_VOUCHER_TYPE: &str = "OPB";

/// Voucher type of the synthetic closing row.
pub const CLOSING_VOUCHER_TYPE: &str = "CLB";

/// Voucher type of the aggregate movement row in summary layouts.
pub const SUMMARY_VOUCHER_TYPE: &str = "TOTAL";

/// Voucher type of sales invoices.
pub const SALES_VOUCHER_TYPE: &str = "SALES";

/// Voucher type of purchase invoices.
pub const PURCHASE_VOUCHER_TYPE: &str = "PURCHASE";

// ============================================================================
// Report catalogue
// ============================================================================

/// Every report the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Contact ledger with opening and closing balances.
    GeneralLedger,
    /// Cash-in-hand ledger.
    CashBook,
    /// Ledger per bank account.
    BankBook,
    /// Raw material movements in the window.
    DailyActivityStock,
    /// Contact movements in the window.
    DailyActivityAccount,
    /// One line of totals per contact, filtered by category.
    GroupSummary,
    /// Receipts from contacts.
    Collection,
    /// Sales register with GST breakup.
    GstSales,
    /// Purchase register with GST breakup.
    GstPurchase,
    /// Crockery issued to and returned from orders.
    CrockeryWithQuantity,
    /// Raw material allocated to orders as general fix.
    GeneralFixWithQuantity,
}

impl ReportKind {
    /// All report kinds.
    pub const ALL: [Self; 11] = [
        Self::GeneralLedger,
        Self::CashBook,
        Self::BankBook,
        Self::DailyActivityStock,
        Self::DailyActivityAccount,
        Self::GroupSummary,
        Self::Collection,
        Self::GstSales,
        Self::GstPurchase,
        Self::CrockeryWithQuantity,
        Self::GeneralFixWithQuantity,
    ];

    /// Stable identifier, also used as the template id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GeneralLedger => "general_ledger",
            Self::CashBook => "cash_book",
            Self::BankBook => "bank_book",
            Self::DailyActivityStock => "daily_activity_stock",
            Self::DailyActivityAccount => "daily_activity_account",
            Self::GroupSummary => "group_summary",
            Self::Collection => "collection",
            Self::GstSales => "gst_sales",
            Self::GstPurchase => "gst_purchase",
            Self::CrockeryWithQuantity => "crockery_with_quantity",
            Self::GeneralFixWithQuantity => "general_fix_with_quantity",
        }
    }

    /// How this report selects, signs and lays out its rows.
    #[must_use]
    pub fn profile(self) -> ReportProfile {
        let base = ReportProfile {
            kind: self,
            source: TransactionSource::AccountHistory,
            grouping: EntityGrouping::Contact,
            sign: SignConvention::InflowPositive,
            inclusion: EntityInclusion::BalanceOrMovement,
            measure: Measure::Amount,
            layout: RowLayout::Detailed,
            direction_filter: None,
            voucher_types: &[],
            gst: false,
            filter_target: FilterTarget::Entity,
            template_id: self.as_str(),
            title: "",
        };

        match self {
            Self::GeneralLedger => ReportProfile {
                title: "General Ledger",
                ..base
            },
            Self::CashBook => ReportProfile {
                grouping: EntityGrouping::CashInHand,
                sign: SignConvention::OutflowPositive,
                filter_target: FilterTarget::Unfiltered,
                title: "Cash Book",
                ..base
            },
            Self::BankBook => ReportProfile {
                grouping: EntityGrouping::BankAccount,
                sign: SignConvention::OutflowPositive,
                title: "Bank Book",
                ..base
            },
            Self::DailyActivityStock => ReportProfile {
                source: TransactionSource::StockHistory,
                grouping: EntityGrouping::RawMaterial,
                inclusion: EntityInclusion::MovementOnly,
                measure: Measure::Quantity,
                title: "Daily Activity (Stock)",
                ..base
            },
            Self::DailyActivityAccount => ReportProfile {
                inclusion: EntityInclusion::MovementOnly,
                title: "Daily Activity (Account)",
                ..base
            },
            Self::GroupSummary => ReportProfile {
                layout: RowLayout::Summary,
                filter_target: FilterTarget::Category,
                title: "Group Summary",
                ..base
            },
            Self::Collection => ReportProfile {
                sign: SignConvention::OutflowPositive,
                inclusion: EntityInclusion::MovementOnly,
                direction_filter: Some(Direction::Outflow),
                title: "Collection",
                ..base
            },
            Self::GstSales => ReportProfile {
                inclusion: EntityInclusion::MovementOnly,
                voucher_types: &[SALES_VOUCHER_TYPE],
                gst: true,
                title: "GST Sales",
                ..base
            },
            Self::GstPurchase => ReportProfile {
                sign: SignConvention::OutflowPositive,
                inclusion: EntityInclusion::MovementOnly,
                voucher_types: &[PURCHASE_VOUCHER_TYPE],
                gst: true,
                title: "GST Purchase",
                ..base
            },
            Self::CrockeryWithQuantity => ReportProfile {
                source: TransactionSource::OrderCrockery,
                grouping: EntityGrouping::CrockeryItem,
                inclusion: EntityInclusion::MovementOnly,
                measure: Measure::Quantity,
                title: "Crockery With Quantity",
                ..base
            },
            Self::GeneralFixWithQuantity => ReportProfile {
                source: TransactionSource::OrderGeneralFix,
                grouping: EntityGrouping::RawMaterial,
                inclusion: EntityInclusion::MovementOnly,
                measure: Measure::Quantity,
                title: "General Fix With Quantity",
                ..base
            },
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ReportError::InvalidFilter(format!("unknown report kind: {s}")))
    }
}

/// Table a report reads its transactions from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    /// `account_history`: cash, bank and journal vouchers.
    AccountHistory,
    /// `stock_history`: raw material transfers.
    StockHistory,
    /// `order_crockery`: crockery issued to orders.
    OrderCrockery,
    /// `order_general_fix_raw_material`: general fix allocations.
    OrderGeneralFix,
}

/// What one ledger in the report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityGrouping {
    /// Party contact.
    Contact,
    /// The single cash-in-hand ledger (cash vouchers).
    CashInHand,
    /// Bank contact (bank vouchers).
    BankAccount,
    /// Raw material item.
    RawMaterial,
    /// Crockery item.
    CrockeryItem,
}

/// Which entities appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityInclusion {
    /// In-window movement or a non-zero opening/closing balance.
    BalanceOrMovement,
    /// In-window movement only.
    MovementOnly,
}

impl EntityInclusion {
    /// Applies the policy.
    #[must_use]
    pub const fn admits(self, has_movement: bool, has_balance: bool) -> bool {
        match self {
            Self::BalanceOrMovement => has_movement || has_balance,
            Self::MovementOnly => has_movement,
        }
    }
}

/// What the ledger sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Currency amounts.
    Amount,
    /// Quantities in measurement units.
    Quantity,
}

/// Shape of the in-window segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLayout {
    /// One row per transaction.
    Detailed,
    /// One aggregate row per entity.
    Summary,
}

/// What a non-zero filter id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTarget {
    /// A single ledger entity.
    Entity,
    /// A contact category.
    Category,
    /// Nothing; the report has a single ledger and only accepts the sentinel.
    Unfiltered,
}

/// Static description of one report kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportProfile {
    /// Report kind.
    pub kind: ReportKind,
    /// Transaction table.
    pub source: TransactionSource,
    /// Ledger owner type.
    pub grouping: EntityGrouping,
    /// Sign of inflows in the running balance.
    pub sign: SignConvention,
    /// Entity inclusion policy.
    pub inclusion: EntityInclusion,
    /// Amount or quantity.
    pub measure: Measure,
    /// Detailed or summary rows.
    pub layout: RowLayout,
    /// Keep only transactions in this direction.
    pub direction_filter: Option<Direction>,
    /// Keep only these voucher types; empty keeps all.
    pub voucher_types: &'static [&'static str],
    /// Attach an inclusive GST breakup to transaction rows.
    pub gst: bool,
    /// Meaning of the filter id.
    pub filter_target: FilterTarget,
    /// Template handed to the renderer.
    pub template_id: &'static str,
    /// Human-readable title.
    pub title: &'static str,
}

impl ReportProfile {
    /// True when a transaction in `direction` with `voucher_type` belongs to this report.
    #[must_use]
    pub fn accepts(&self, direction: Direction, voucher_type: &str) -> bool {
        let direction_ok = self.direction_filter.is_none_or(|wanted| wanted == direction);
        let voucher_ok = self.voucher_types.is_empty()
            || self
                .voucher_types
                .iter()
                .any(|v| v.eq_ignore_ascii_case(voucher_type));
        direction_ok && voucher_ok
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Entity/category restriction of a source query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityFilter {
    /// Single entity, if restricted.
    pub entity_id: Option<EntityId>,
    /// Contact category, if restricted.
    pub category_id: Option<CategoryId>,
}

impl EntityFilter {
    /// Filter that keeps every entity.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            entity_id: None,
            category_id: None,
        }
    }

    /// Interprets a raw filter id; [`NO_FILTER_SENTINEL`] keeps every entity.
    pub fn from_raw(raw: i64, target: FilterTarget) -> Result<Self, ReportError> {
        if raw < NO_FILTER_SENTINEL {
            return Err(ReportError::InvalidFilter(format!(
                "filter id must be {NO_FILTER_SENTINEL} or positive, got {raw}"
            )));
        }
        if raw == NO_FILTER_SENTINEL {
            return Ok(Self::all());
        }
        Ok(match target {
            FilterTarget::Entity => Self {
                entity_id: Some(EntityId(raw)),
                category_id: None,
            },
            FilterTarget::Category => Self {
                entity_id: None,
                category_id: Some(CategoryId(raw)),
            },
            FilterTarget::Unfiltered => {
                return Err(ReportError::InvalidFilter(format!(
                    "report takes no filter id, got {raw}"
                )));
            }
        })
    }

    /// True when no restriction applies.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.entity_id.is_none() && self.category_id.is_none()
    }
}

/// Parameters of one report invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Entity or category id; `0` for all.
    pub entity_filter_id: i64,
    /// Date window.
    pub window: DateWindow,
    /// Language for localized names.
    pub language: LanguageSelector,
}

impl ReportRequest {
    /// Validates and builds a request.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` for a negative filter id or an end date before the
    /// start date.
    pub fn new(
        entity_filter_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Self, ReportError> {
        // Validate the id early; the target is irrelevant here.
        EntityFilter::from_raw(entity_filter_id, FilterTarget::Entity)?;
        Ok(Self {
            entity_filter_id,
            window: DateWindow::new(start, end)?,
            language,
        })
    }

    /// Re-checks a request that did not come through [`Self::new`].
    ///
    /// # Errors
    ///
    /// `InvalidFilter` for a negative filter id or an inverted window.
    pub fn validate(&self) -> Result<(), ReportError> {
        EntityFilter::from_raw(self.entity_filter_id, FilterTarget::Entity)?;
        self.window.validate()?;
        Ok(())
    }

    /// Filter for a report whose filter id means `target`.
    pub fn filter(&self, target: FilterTarget) -> Result<EntityFilter, ReportError> {
        EntityFilter::from_raw(self.entity_filter_id, target)
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Segment of a ledger row; rows sort by segment within an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RowSegment {
    /// Balance brought forward.
    Opening = 1,
    /// In-window transaction.
    Transaction = 2,
    /// Balance carried forward.
    Closing = 3,
}

impl From<RowSegment> for u8 {
    fn from(segment: RowSegment) -> Self {
        segment as Self
    }
}

impl TryFrom<u8> for RowSegment {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Opening),
            2 => Ok(Self::Transaction),
            3 => Ok(Self::Closing),
            other => Err(format!("invalid row segment: {other}")),
        }
    }
}

/// One report row handed to the renderer. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Ledger owner.
    pub entity_id: EntityId,
    /// Localized owner name.
    pub entity_name: String,
    /// Opening, transaction or closing.
    pub seq: RowSegment,
    /// Source transaction; `None` on synthetic rows.
    pub transaction_id: Option<TransactionId>,
    /// Transaction date, or the window bound on synthetic rows.
    pub date: Option<NaiveDate>,
    /// Voucher number, display only.
    pub voucher_number: Option<String>,
    /// Voucher type (`OPB`/`CLB` on synthetic rows).
    pub voucher_type: String,
    /// Positive column (jama on activity reports).
    pub debit: Decimal,
    /// Negative column (udhar on activity reports).
    pub credit: Decimal,
    /// Balance after this row.
    pub running_balance: Decimal,
    /// Free-text remark.
    pub remark: Option<String>,
    /// Decimal places for `debit` and `credit`.
    pub decimal_precision: i32,
    /// Unit of `debit` and `credit` on quantity reports.
    pub unit_id: Option<UnitId>,
    /// Unit of `running_balance` on quantity reports.
    pub balance_unit_id: Option<UnitId>,
    /// Decimal places for `running_balance`.
    pub balance_precision: i32,
    /// Inclusive GST breakup on GST registers.
    pub gst: Option<GstBreakup>,
}

impl LedgerRow {
    /// The single row of a report with no data: the entity name and zeros.
    ///
    /// Every numeric column is zero, precisions included.
    #[must_use]
    pub fn placeholder(
        entity_id: EntityId,
        entity_name: impl Into<String>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            entity_id,
            entity_name: entity_name.into(),
            seq: RowSegment::Opening,
            transaction_id: None,
            date,
            voucher_number: None,
            voucher_type: OPENING_VOUCHER_TYPE.to_string(),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            running_balance: Decimal::ZERO,
            remark: None,
            decimal_precision: 0,
            unit_id: None,
            balance_unit_id: None,
            balance_precision: 0,
            gst: None,
        }
    }

    /// Ordering key `(entity, segment, date, transaction)`.
    #[must_use]
    pub fn sort_key(&self) -> (EntityId, RowSegment, Option<NaiveDate>, Option<TransactionId>) {
        (self.entity_id, self.seq, self.date, self.transaction_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_follow_catalogue() {
        for kind in ReportKind::ALL {
            let profile = kind.profile();
            assert_eq!(profile.kind, kind);
            assert_eq!(profile.template_id, kind.as_str());
            assert!(!profile.title.is_empty());
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_sign_conventions() {
        assert_eq!(ReportKind::GeneralLedger.profile().sign, SignConvention::InflowPositive);
        assert_eq!(ReportKind::CashBook.profile().sign, SignConvention::OutflowPositive);
        assert_eq!(ReportKind::BankBook.profile().sign, SignConvention::OutflowPositive);
    }

    #[test]
    fn test_quantity_reports_are_movement_only() {
        for kind in [
            ReportKind::DailyActivityStock,
            ReportKind::CrockeryWithQuantity,
            ReportKind::GeneralFixWithQuantity,
        ] {
            let profile = kind.profile();
            assert_eq!(profile.measure, Measure::Quantity);
            assert_eq!(profile.inclusion, EntityInclusion::MovementOnly);
        }
    }

    #[test]
    fn test_profile_accepts() {
        let collection = ReportKind::Collection.profile();
        assert!(collection.accepts(Direction::Outflow, "CASH"));
        assert!(!collection.accepts(Direction::Inflow, "CASH"));

        let sales = ReportKind::GstSales.profile();
        assert!(sales.accepts(Direction::Inflow, "sales"));
        assert!(!sales.accepts(Direction::Inflow, "PURCHASE"));

        let ledger = ReportKind::GeneralLedger.profile();
        assert!(ledger.accepts(Direction::Inflow, "JOURNAL"));
    }

    #[test]
    fn test_parse_report_kind() {
        assert_eq!("cash-book".parse::<ReportKind>().unwrap(), ReportKind::CashBook);
        assert!(matches!(
            "ledger".parse::<ReportKind>(),
            Err(ReportError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_filter_sentinel() {
        assert!(EntityFilter::from_raw(0, FilterTarget::Entity).unwrap().is_unfiltered());
        assert_eq!(
            EntityFilter::from_raw(7, FilterTarget::Entity).unwrap().entity_id,
            Some(EntityId(7))
        );
        assert_eq!(
            EntityFilter::from_raw(7, FilterTarget::Category).unwrap().category_id,
            Some(CategoryId(7))
        );
        assert!(matches!(
            EntityFilter::from_raw(-1, FilterTarget::Entity),
            Err(ReportError::InvalidFilter(_))
        ));
        assert!(EntityFilter::from_raw(0, FilterTarget::Unfiltered).unwrap().is_unfiltered());
        assert!(matches!(
            EntityFilter::from_raw(5, FilterTarget::Unfiltered),
            Err(ReportError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_request_validation() {
        let jan = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
        assert!(ReportRequest::new(0, Some(jan(1)), Some(jan(31)), LanguageSelector::Default).is_ok());
        assert!(matches!(
            ReportRequest::new(0, Some(jan(31)), Some(jan(1)), LanguageSelector::Default),
            Err(ReportError::InvalidFilter(_))
        ));
        assert!(matches!(
            ReportRequest::new(-3, None, None, LanguageSelector::Default),
            Err(ReportError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_decoded_request_keeps_window_invariant() {
        let inverted = r#"{"entity_filter_id":0,"window":{"start":"2025-02-01","end":"2025-01-01"},"language":0}"#;
        assert!(serde_json::from_str::<ReportRequest>(inverted).is_err());

        let negative = r#"{"entity_filter_id":-4,"window":{"start":null,"end":null},"language":1}"#;
        let request: ReportRequest = serde_json::from_str(negative).unwrap();
        assert!(matches!(request.validate(), Err(ReportError::InvalidFilter(_))));

        let valid = r#"{"entity_filter_id":3,"window":{"start":"2025-01-01","end":"2025-01-31"},"language":2}"#;
        let request: ReportRequest = serde_json::from_str(valid).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.language, LanguageSelector::Supportive);
    }

    #[test]
    fn test_placeholder_is_all_zero() {
        let row = LedgerRow::placeholder(EntityId(1), "Cash", None);
        assert_eq!(row.debit, Decimal::ZERO);
        assert_eq!(row.credit, Decimal::ZERO);
        assert_eq!(row.running_balance, Decimal::ZERO);
        assert_eq!(row.decimal_precision, 0);
        assert_eq!(row.balance_precision, 0);
        assert_eq!(row.seq, RowSegment::Opening);
    }

    #[test]
    fn test_row_segment_serializes_as_number() {
        let row = LedgerRow::placeholder(EntityId(1), "Cash", None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["seq"], 1);
        assert_eq!(json["voucher_type"], "OPB");
        assert!(RowSegment::Opening < RowSegment::Transaction);
        assert!(RowSegment::Transaction < RowSegment::Closing);
    }
}
