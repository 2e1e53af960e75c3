//! Report source repository.
//!
//! Reads the history tables behind every ledger report and maps their rows
//! into [`SourceTransaction`]s. Only rows up to the window end are fetched;
//! the engine needs everything before the window start for the opening
//! balance.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use banquet_core::ledger::Direction;
use banquet_core::locale::LocalizedText;
use banquet_core::reports::{
    EntityFilter, EntityGrouping, LedgerSource, SourceError, SourceQuery, SourceTransaction,
    TransactionSource,
};
use banquet_shared::types::{EntityId, TransactionId, UnitId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
};
use tracing::debug;

use crate::entities::{
    account_history, contact, contact_category, crockery, order_crockery,
    order_general_fix_raw_material, raw_material, stock_history,
};

/// Entity id of the single cash-in-hand ledger.
pub const CASH_IN_HAND_ENTITY_ID: EntityId = EntityId(-1);

/// Display name of the cash-in-hand ledger.
pub const CASH_IN_HAND_NAME: &str = "Cash In Hand";

/// `account_history.payment_mode` values.
pub mod payment_mode {
    /// Journal voucher, no money moves.
    pub const JOURNAL: i16 = 0;
    /// Cash voucher.
    pub const CASH: i16 = 1;
    /// Bank voucher.
    pub const BANK: i16 = 2;
}

fn query_error(err: DbErr) -> SourceError {
    SourceError::Query(err.to_string())
}

fn direction(code: i16, table: &str, id: i64) -> Result<Direction, SourceError> {
    Direction::from_code(code).ok_or_else(|| {
        SourceError::InvalidRow(format!("{table} row {id} has unknown direction {code}"))
    })
}

fn localized(name: String, preferred: Option<String>, supportive: Option<String>) -> LocalizedText {
    LocalizedText::new(name).with_translations(preferred, supportive)
}

/// Database-backed [`LedgerSource`].
// sea-orm's `mock` feature (dev-dependency) drops `Clone` from `DatabaseConnection`.
#[derive(Debug)]
#[cfg_attr(not(test), derive(Clone))]
pub struct LedgerSourceRepository {
    db: DatabaseConnection,
}

impl LedgerSourceRepository {
    /// Creates a new source repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ========================================================================
    // Account history (general ledger, cash book, bank book, registers)
    // ========================================================================

    async fn account_transactions(
        &self,
        grouping: EntityGrouping,
        filter: &EntityFilter,
        until: Option<NaiveDate>,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let mut select = account_history::Entity::find();
        select = match grouping {
            EntityGrouping::CashInHand => {
                select.filter(account_history::Column::PaymentMode.eq(payment_mode::CASH))
            }
            EntityGrouping::BankAccount => {
                let select = select
                    .filter(account_history::Column::PaymentMode.eq(payment_mode::BANK))
                    .filter(account_history::Column::BankContactId.is_not_null());
                match filter.entity_id {
                    Some(id) => select.filter(account_history::Column::BankContactId.eq(id.get())),
                    None => select,
                }
            }
            _ => {
                if let Some(id) = filter.entity_id {
                    select.filter(account_history::Column::ContactId.eq(id.get()))
                } else if let Some(category) = filter.category_id {
                    let members = self.contacts_in_category(category.get()).await?;
                    if members.is_empty() {
                        return Ok(Vec::new());
                    }
                    select.filter(account_history::Column::ContactId.is_in(members))
                } else {
                    select
                }
            }
        };
        if let Some(until) = until {
            select = select.filter(account_history::Column::TransactionDate.lte(until));
        }

        let rows = select
            .order_by_asc(account_history::Column::TransactionDate)
            .order_by_asc(account_history::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        let owner = |row: &account_history::Model| match grouping {
            EntityGrouping::CashInHand => CASH_IN_HAND_ENTITY_ID.get(),
            EntityGrouping::BankAccount => row.bank_contact_id.unwrap_or(row.contact_id),
            _ => row.contact_id,
        };

        let names = if grouping == EntityGrouping::CashInHand {
            HashMap::new()
        } else {
            self.contact_names(rows.iter().map(owner).collect()).await?
        };

        rows.into_iter()
            .map(|row| {
                let entity = owner(&row);
                Ok(SourceTransaction {
                    entity_id: EntityId(entity),
                    entity_name: Self::name_of(grouping, entity, &names),
                    transaction_id: TransactionId(row.id),
                    date: row.transaction_date,
                    direction: direction(row.transaction_type, "account_history", row.id)?,
                    amount: row.amount,
                    unit_id: None,
                    voucher_number: row.voucher_number,
                    voucher_type: row.voucher_type,
                    remark: row.remark,
                    gst_rate: row.gst_rate,
                })
            })
            .collect()
    }

    async fn contacts_in_category(&self, category_id: i64) -> Result<Vec<i64>, SourceError> {
        let contacts = contact::Entity::find()
            .filter(contact::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await
            .map_err(query_error)?;
        Ok(contacts.into_iter().map(|c| c.id).collect())
    }

    async fn contact_names(
        &self,
        ids: BTreeSet<i64>,
    ) -> Result<HashMap<i64, LocalizedText>, SourceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let contacts = contact::Entity::find()
            .filter(contact::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;
        Ok(contacts
            .into_iter()
            .map(|c| (c.id, localized(c.name, c.preferred_name, c.supportive_name)))
            .collect())
    }

    // ========================================================================
    // Quantity sources (stock, crockery, general fix)
    // ========================================================================

    async fn stock_transactions(
        &self,
        filter: &EntityFilter,
        until: Option<NaiveDate>,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let mut select = stock_history::Entity::find();
        if let Some(id) = filter.entity_id {
            select = select.filter(stock_history::Column::RawMaterialId.eq(id.get()));
        }
        if let Some(until) = until {
            select = select.filter(stock_history::Column::TransferDate.lte(until));
        }
        let rows = self
            .ordered(
                select,
                stock_history::Column::TransferDate,
                stock_history::Column::Id,
            )
            .await?;

        let names = self
            .raw_material_names(rows.iter().map(|r| r.raw_material_id).collect())
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Self::quantity_row(
                    QuantityRow {
                        entity: row.raw_material_id,
                        id: row.id,
                        date: row.transfer_date,
                        direction: direction(row.transfer_type, "stock_history", row.id)?,
                        quantity: row.quantity,
                        unit: row.measurement_id,
                        voucher_number: row.voucher_number,
                        voucher_type: "STOCK",
                        remark: row.remark,
                    },
                    &names,
                ))
            })
            .collect()
    }

    async fn crockery_transactions(
        &self,
        filter: &EntityFilter,
        until: Option<NaiveDate>,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let mut select = order_crockery::Entity::find();
        if let Some(id) = filter.entity_id {
            select = select.filter(order_crockery::Column::CrockeryId.eq(id.get()));
        }
        if let Some(until) = until {
            select = select.filter(order_crockery::Column::OrderDate.lte(until));
        }
        let rows = self
            .ordered(
                select,
                order_crockery::Column::OrderDate,
                order_crockery::Column::Id,
            )
            .await?;

        let ids: BTreeSet<i64> = rows.iter().map(|r| r.crockery_id).collect();
        let names: HashMap<i64, LocalizedText> = if ids.is_empty() {
            HashMap::new()
        } else {
            crockery::Entity::find()
                .filter(crockery::Column::Id.is_in(ids))
                .all(&self.db)
                .await
                .map_err(query_error)?
                .into_iter()
                .map(|c| (c.id, localized(c.name, c.preferred_name, c.supportive_name)))
                .collect()
        };

        rows.into_iter()
            .map(|row| {
                Ok(Self::quantity_row(
                    QuantityRow {
                        entity: row.crockery_id,
                        id: row.id,
                        date: row.order_date,
                        direction: direction(row.transfer_type, "order_crockery", row.id)?,
                        quantity: row.quantity,
                        unit: row.measurement_id,
                        voucher_number: Some(row.order_id.to_string()),
                        voucher_type: "ORDER",
                        remark: row.remark,
                    },
                    &names,
                ))
            })
            .collect()
    }

    async fn general_fix_transactions(
        &self,
        filter: &EntityFilter,
        until: Option<NaiveDate>,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let mut select = order_general_fix_raw_material::Entity::find();
        if let Some(id) = filter.entity_id {
            select =
                select.filter(order_general_fix_raw_material::Column::RawMaterialId.eq(id.get()));
        }
        if let Some(until) = until {
            select = select.filter(order_general_fix_raw_material::Column::OrderDate.lte(until));
        }
        let rows = self
            .ordered(
                select,
                order_general_fix_raw_material::Column::OrderDate,
                order_general_fix_raw_material::Column::Id,
            )
            .await?;

        let names = self
            .raw_material_names(rows.iter().map(|r| r.raw_material_id).collect())
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Self::quantity_row(
                    QuantityRow {
                        entity: row.raw_material_id,
                        id: row.id,
                        date: row.order_date,
                        direction: direction(
                            row.transfer_type,
                            "order_general_fix_raw_material",
                            row.id,
                        )?,
                        quantity: row.quantity,
                        unit: row.measurement_id,
                        voucher_number: Some(row.order_id.to_string()),
                        voucher_type: "ORDER",
                        remark: row.remark,
                    },
                    &names,
                ))
            })
            .collect()
    }

    async fn raw_material_names(
        &self,
        ids: BTreeSet<i64>,
    ) -> Result<HashMap<i64, LocalizedText>, SourceError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let materials = raw_material::Entity::find()
            .filter(raw_material::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(query_error)?;
        Ok(materials
            .into_iter()
            .map(|m| (m.id, localized(m.name, m.preferred_name, m.supportive_name)))
            .collect())
    }

    async fn ordered<E: EntityTrait>(
        &self,
        select: Select<E>,
        date: E::Column,
        id: E::Column,
    ) -> Result<Vec<E::Model>, SourceError> {
        select
            .order_by_asc(date)
            .order_by_asc(id)
            .all(&self.db)
            .await
            .map_err(query_error)
    }

    fn quantity_row(row: QuantityRow, names: &HashMap<i64, LocalizedText>) -> SourceTransaction {
        SourceTransaction {
            entity_id: EntityId(row.entity),
            entity_name: names
                .get(&row.entity)
                .cloned()
                .unwrap_or_else(|| LocalizedText::new(row.entity.to_string())),
            transaction_id: TransactionId(row.id),
            date: row.date,
            direction: row.direction,
            amount: row.quantity,
            unit_id: Some(UnitId(row.unit)),
            voucher_number: row.voucher_number,
            voucher_type: row.voucher_type.to_string(),
            remark: row.remark,
            gst_rate: None,
        }
    }

    fn name_of(
        grouping: EntityGrouping,
        entity: i64,
        names: &HashMap<i64, LocalizedText>,
    ) -> LocalizedText {
        if grouping == EntityGrouping::CashInHand {
            return LocalizedText::new(CASH_IN_HAND_NAME);
        }
        names
            .get(&entity)
            .cloned()
            .unwrap_or_else(|| LocalizedText::new(entity.to_string()))
    }
}

/// Common shape of the quantity history tables.
struct QuantityRow {
    entity: i64,
    id: i64,
    date: NaiveDate,
    direction: Direction,
    quantity: Decimal,
    unit: i64,
    voucher_number: Option<String>,
    voucher_type: &'static str,
    remark: Option<String>,
}

#[async_trait]
impl LedgerSource for LedgerSourceRepository {
    async fn fetch_transactions(
        &self,
        query: &SourceQuery,
    ) -> Result<Vec<SourceTransaction>, SourceError> {
        let rows = match query.source {
            TransactionSource::AccountHistory => {
                self.account_transactions(query.grouping, &query.filter, query.until)
                    .await?
            }
            TransactionSource::StockHistory => {
                self.stock_transactions(&query.filter, query.until).await?
            }
            TransactionSource::OrderCrockery => {
                self.crockery_transactions(&query.filter, query.until).await?
            }
            TransactionSource::OrderGeneralFix => {
                self.general_fix_transactions(&query.filter, query.until)
                    .await?
            }
        };
        debug!(source = ?query.source, rows = rows.len(), "Loaded source transactions");
        Ok(rows)
    }

    async fn entity_name(
        &self,
        grouping: EntityGrouping,
        filter: &EntityFilter,
    ) -> Result<Option<LocalizedText>, SourceError> {
        if grouping == EntityGrouping::CashInHand {
            return Ok(Some(LocalizedText::new(CASH_IN_HAND_NAME)));
        }

        if let Some(id) = filter.entity_id {
            let id = id.get();
            let name = match grouping {
                EntityGrouping::Contact | EntityGrouping::BankAccount | EntityGrouping::CashInHand => {
                    contact::Entity::find_by_id(id)
                        .one(&self.db)
                        .await
                        .map_err(query_error)?
                        .map(|c| localized(c.name, c.preferred_name, c.supportive_name))
                }
                EntityGrouping::RawMaterial => raw_material::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(query_error)?
                    .map(|m| localized(m.name, m.preferred_name, m.supportive_name)),
                EntityGrouping::CrockeryItem => crockery::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(query_error)?
                    .map(|c| localized(c.name, c.preferred_name, c.supportive_name)),
            };
            return Ok(name);
        }

        if let Some(category) = filter.category_id {
            return Ok(contact_category::Entity::find_by_id(category.get())
                .one(&self.db)
                .await
                .map_err(query_error)?
                .map(|c| localized(c.name, c.preferred_name, c.supportive_name)));
        }

        Ok(None)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
