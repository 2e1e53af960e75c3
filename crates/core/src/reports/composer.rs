//! Report row composition.
//!
//! Turns source transactions into the three-segment row list of a report:
//! per entity an opening row, the in-window rows and a closing row, ordered by
//! `(entity, segment, date, transaction)`. Composition is pure; fetching lives
//! in the service.

use std::collections::BTreeMap;
use std::sync::Arc;

use banquet_shared::types::{DateWindow, EntityId, LanguageSelector, TransactionId, UnitId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::source::{SourceError, SourceTransaction};
use super::types::{
    CLOSING_VOUCHER_TYPE, LedgerRow, Measure, OPENING_VOUCHER_TYPE, ReportProfile, ReportRequest,
    RowLayout, RowSegment, SUMMARY_VOUCHER_TYPE,
};
use crate::gst::{GstBreakup, split_inclusive};
use crate::ledger::{BalanceSplit, Direction, EntityLedger, LedgerEngine, Posting};
use crate::locale::LocalizedText;
use crate::units::{PrecisionPolicy, UnitError, UnitReconciler, UnitTable};

/// A source transaction with its magnitude in summation units.
#[derive(Debug, Clone)]
struct NormalizedPosting {
    transaction: SourceTransaction,
    magnitude: Decimal,
}

impl Posting for NormalizedPosting {
    fn transaction_id(&self) -> TransactionId {
        self.transaction.transaction_id
    }

    fn posted_on(&self) -> NaiveDate {
        self.transaction.date
    }

    fn direction(&self) -> Direction {
        self.transaction.direction
    }

    fn magnitude(&self) -> Decimal {
        self.magnitude
    }
}

/// Per-entity input to the engine.
struct EntityGroup {
    name: LocalizedText,
    base_unit_id: Option<UnitId>,
    postings: Vec<NormalizedPosting>,
}

/// Builds report rows from source transactions.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    units: Arc<UnitTable>,
    precision: PrecisionPolicy,
    currency_decimal_places: u32,
}

impl ReportComposer {
    /// Creates a composer.
    #[must_use]
    pub fn new(units: Arc<UnitTable>, precision: PrecisionPolicy, currency_decimal_places: u32) -> Self {
        Self {
            units,
            precision,
            currency_decimal_places,
        }
    }

    /// Decimal places of currency columns, as carried on rows.
    #[must_use]
    pub fn currency_precision(&self) -> i32 {
        i32::try_from(self.currency_decimal_places).unwrap_or(i32::MAX)
    }

    /// Composes the rows of one report.
    ///
    /// # Errors
    ///
    /// `Unit` when a quantity row has no unit, an unknown unit, or an entity
    /// mixes unit families; `DataFetch` when a GST rate is invalid.
    pub fn compose(
        &self,
        profile: &ReportProfile,
        request: &ReportRequest,
        transactions: Vec<SourceTransaction>,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        let groups = self.group(profile, transactions)?;

        let mut names = Vec::with_capacity(groups.len());
        let mut inputs = Vec::with_capacity(groups.len());
        for (entity_id, group) in groups {
            names.push((group.name, group.base_unit_id));
            inputs.push((entity_id, group.postings));
        }

        let engine = LedgerEngine::new(profile.sign);
        let ledgers = engine.compute_many(&request.window, inputs);

        let mut rows = Vec::new();
        for (ledger, (name, base_unit_id)) in ledgers.into_iter().zip(names) {
            if !profile
                .inclusion
                .admits(ledger.has_movement(), ledger.has_balance())
            {
                continue;
            }

            let context = EntityContext {
                name: name.resolve(request.language).to_string(),
                base_unit_id,
                window: request.window,
            };
            self.push_entity_rows(profile, &context, &ledger, &mut rows)?;
        }

        Ok(rows)
    }

    /// Filters, groups by entity and converts quantities to base units.
    fn group(
        &self,
        profile: &ReportProfile,
        transactions: Vec<SourceTransaction>,
    ) -> Result<BTreeMap<EntityId, EntityGroup>, ReportError> {
        let mut groups: BTreeMap<EntityId, EntityGroup> = BTreeMap::new();
        let reconciler = self.reconciler(profile);

        for transaction in transactions {
            if !profile.accepts(transaction.direction, &transaction.voucher_type) {
                continue;
            }

            let (magnitude, family) = match profile.measure {
                Measure::Amount => (transaction.amount, None),
                Measure::Quantity => {
                    let unit_id = transaction
                        .unit_id
                        .ok_or(UnitError::MissingUnit(transaction.transaction_id))?;
                    let expected = groups
                        .get(&transaction.entity_id)
                        .and_then(|group| group.base_unit_id);
                    let (base, family) =
                        reconciler.to_family_base(transaction.amount, unit_id, expected)?;
                    (base, Some(family))
                }
            };

            let group = groups
                .entry(transaction.entity_id)
                .or_insert_with(|| EntityGroup {
                    name: transaction.entity_name.clone(),
                    base_unit_id: family,
                    postings: Vec::new(),
                });

            group.postings.push(NormalizedPosting {
                transaction,
                magnitude,
            });
        }

        Ok(groups)
    }

    fn push_entity_rows(
        &self,
        profile: &ReportProfile,
        context: &EntityContext,
        ledger: &EntityLedger<NormalizedPosting>,
        rows: &mut Vec<LedgerRow>,
    ) -> Result<(), ReportError> {
        let reconciler = match (profile.measure, context.base_unit_id) {
            (Measure::Quantity, Some(base)) => Some((self.reconciler(profile), base)),
            _ => None,
        };
        let balance = |value: Decimal| -> Result<BalanceColumns, ReportError> {
            match &reconciler {
                Some((reconciler, base)) => {
                    let quantity = reconciler.express(value, *base)?;
                    Ok(BalanceColumns {
                        value: quantity.display_value,
                        split: BalanceSplit {
                            debit: quantity.jama,
                            credit: quantity.udhar,
                        },
                        unit_id: Some(quantity.display_unit_id),
                        precision: quantity.precision,
                    })
                }
                None => Ok(BalanceColumns {
                    value,
                    split: BalanceSplit::of(value),
                    unit_id: None,
                    precision: self.currency_precision(),
                }),
            }
        };

        let opening = balance(ledger.opening.balance)?;
        rows.push(context.synthetic_row(
            ledger.entity_id,
            RowSegment::Opening,
            OPENING_VOUCHER_TYPE,
            &opening,
        ));

        match profile.layout {
            RowLayout::Detailed => {
                for entry in &ledger.entries {
                    let tx = &entry.posting.transaction;
                    let running = balance(entry.running_balance)?;
                    let (split, unit_id, precision) = match profile.measure {
                        Measure::Amount => (
                            BalanceSplit::of(entry.contribution),
                            None,
                            self.currency_precision(),
                        ),
                        Measure::Quantity => {
                            let unit_id = tx
                                .unit_id
                                .ok_or(UnitError::MissingUnit(tx.transaction_id))?;
                            let declared = self.units.get(unit_id)?.declared_precision;
                            (
                                BalanceSplit::of(profile.sign.signed(tx.direction, tx.amount)),
                                Some(unit_id),
                                self.precision.resolve(unit_id, declared, tx.amount),
                            )
                        }
                    };

                    rows.push(LedgerRow {
                        entity_id: ledger.entity_id,
                        entity_name: context.name.clone(),
                        seq: RowSegment::Transaction,
                        transaction_id: Some(tx.transaction_id),
                        date: Some(tx.date),
                        voucher_number: tx.voucher_number.clone(),
                        voucher_type: tx.voucher_type.clone(),
                        debit: split.debit,
                        credit: split.credit,
                        running_balance: running.value,
                        remark: tx.remark.clone(),
                        decimal_precision: precision,
                        unit_id,
                        balance_unit_id: running.unit_id,
                        balance_precision: running.precision,
                        gst: self.gst_breakup(profile, tx)?,
                    });
                }
            }
            RowLayout::Summary => {
                if ledger.has_movement() {
                    let (debit, credit) = ledger.entries.iter().fold(
                        (Decimal::ZERO, Decimal::ZERO),
                        |(debit, credit), entry| {
                            let split = BalanceSplit::of(entry.contribution);
                            (debit + split.debit, credit + split.credit)
                        },
                    );
                    let closing = balance(ledger.closing.balance)?;
                    rows.push(LedgerRow {
                        entity_id: ledger.entity_id,
                        entity_name: context.name.clone(),
                        seq: RowSegment::Transaction,
                        transaction_id: None,
                        date: context.window.end(),
                        voucher_number: None,
                        voucher_type: SUMMARY_VOUCHER_TYPE.to_string(),
                        debit,
                        credit,
                        running_balance: closing.value,
                        remark: None,
                        decimal_precision: closing.precision,
                        unit_id: closing.unit_id,
                        balance_unit_id: closing.unit_id,
                        balance_precision: closing.precision,
                        gst: None,
                    });
                }
            }
        }

        let closing = balance(ledger.closing.balance)?;
        rows.push(context.synthetic_row(
            ledger.entity_id,
            RowSegment::Closing,
            CLOSING_VOUCHER_TYPE,
            &closing,
        ));

        Ok(())
    }

    fn reconciler(&self, profile: &ReportProfile) -> UnitReconciler {
        UnitReconciler::new(Arc::clone(&self.units), self.precision.clone()).with_sign(profile.sign)
    }

    fn gst_breakup(
        &self,
        profile: &ReportProfile,
        tx: &SourceTransaction,
    ) -> Result<Option<GstBreakup>, ReportError> {
        if !profile.gst {
            return Ok(None);
        }
        let Some(rate) = tx.gst_rate else {
            return Ok(None);
        };
        split_inclusive(tx.amount, rate, self.currency_decimal_places)
            .map(Some)
            .map_err(|e| {
                ReportError::DataFetch(SourceError::InvalidRow(format!(
                    "transaction {}: {e}",
                    tx.transaction_id
                )))
            })
    }
}

/// A balance ready for a row.
struct BalanceColumns {
    value: Decimal,
    split: BalanceSplit,
    unit_id: Option<UnitId>,
    precision: i32,
}

struct EntityContext {
    name: String,
    base_unit_id: Option<UnitId>,
    window: DateWindow,
}

impl EntityContext {
    fn synthetic_row(
        &self,
        entity_id: EntityId,
        seq: RowSegment,
        voucher_type: &str,
        balance: &BalanceColumns,
    ) -> LedgerRow {
        let date = match seq {
            RowSegment::Opening => self.window.start(),
            RowSegment::Transaction | RowSegment::Closing => self.window.end(),
        };
        LedgerRow {
            entity_id,
            entity_name: self.name.clone(),
            seq,
            transaction_id: None,
            date,
            voucher_number: None,
            voucher_type: voucher_type.to_string(),
            debit: balance.split.debit,
            credit: balance.split.credit,
            running_balance: balance.value,
            remark: None,
            decimal_precision: balance.precision,
            unit_id: balance.unit_id,
            balance_unit_id: balance.unit_id,
            balance_precision: balance.precision,
            gst: None,
        }
    }
}

/// Resolves a localized name outside a composed report.
#[must_use]
pub fn display_name(name: &LocalizedText, language: LanguageSelector) -> String {
    name.resolve(language).to_string()
}
