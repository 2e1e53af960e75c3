//! Measurement reference data.
//!
//! The unit table changes rarely and every quantity report needs it, so the
//! loaded table is kept in a small Moka cache with a time-to-live.

use std::sync::Arc;
use std::time::Duration;

use banquet_core::locale::LocalizedText;
use banquet_core::units::{MeasurementUnit, UnitError, UnitTable};
use banquet_shared::types::UnitId;
use moka::future::Cache;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::entities::measurement;

const TABLE_KEY: &str = "measurement";

/// Errors from loading the unit table.
#[derive(Debug, Error)]
pub enum MeasurementError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Rows do not form a valid unit table.
    #[error("Invalid measurement table: {0}")]
    InvalidTable(#[from] UnitError),
}

/// Repository for the measurement table.
// sea-orm's `mock` feature (dev-dependency) drops `Clone` from `DatabaseConnection`.
#[cfg_attr(not(test), derive(Clone))]
pub struct MeasurementRepository {
    db: DatabaseConnection,
    cache: Cache<&'static str, Arc<UnitTable>>,
}

impl MeasurementRepository {
    /// Creates a repository whose cached table expires after `ttl`.
    #[must_use]
    pub fn new(db: DatabaseConnection, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { db, cache }
    }

    /// Returns the unit table, loading it on a cache miss.
    ///
    /// An empty measurement table falls back to [`UnitTable::standard`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the rows are inconsistent.
    pub async fn unit_table(&self) -> Result<Arc<UnitTable>, MeasurementError> {
        if let Some(table) = self.cache.get(TABLE_KEY).await {
            return Ok(table);
        }

        let table = Arc::new(self.load().await?);
        self.cache.insert(TABLE_KEY, Arc::clone(&table)).await;
        Ok(table)
    }

    /// Drops the cached table so the next call reloads it.
    pub async fn invalidate(&self) {
        self.cache.invalidate(TABLE_KEY).await;
    }

    async fn load(&self) -> Result<UnitTable, MeasurementError> {
        let rows = measurement::Entity::find()
            .order_by_asc(measurement::Column::Id)
            .all(&self.db)
            .await?;

        if rows.is_empty() {
            warn!("Measurement table is empty, using built-in units");
            return Ok(UnitTable::standard());
        }

        debug!(units = rows.len(), "Loaded measurement units");
        let table = UnitTable::new(rows.into_iter().map(to_unit))?;
        Ok(table)
    }
}

fn to_unit(row: measurement::Model) -> MeasurementUnit {
    MeasurementUnit {
        id: UnitId(row.id),
        name: LocalizedText::new(row.name)
            .with_translations(row.preferred_name, row.supportive_name),
        symbol: row.symbol,
        base_unit_id: UnitId(row.base_unit_id),
        base_equivalent: row.base_unit_equivalent,
        smallest_unit_id: row.smallest_unit_id.map(UnitId),
        declared_precision: row.decimal_precision,
    }
}
