//! Report error types.

use std::time::Duration;

use banquet_shared::AppError;
use banquet_shared::types::WindowError;
use thiserror::Error;

use super::render::RenderError;
use super::source::SourceError;
use crate::units::UnitError;

/// Errors that can occur during report generation.
///
/// An empty ledger is not an error; it produces a placeholder row.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Request parameters rejected before any query runs.
    #[error("Invalid report filter: {0}")]
    InvalidFilter(String),

    /// The data source failed; no partial ledger is produced.
    #[error("Failed to fetch report data: {0}")]
    DataFetch(#[from] SourceError),

    /// The data source did not answer in time.
    #[error("Report data fetch timed out after {0:?}")]
    Timeout(Duration),

    /// Quantity rows referenced units that cannot be reconciled.
    #[error("Unit reconciliation failed: {0}")]
    Unit(#[from] UnitError),

    /// The renderer failed after the rows were assembled.
    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl From<WindowError> for ReportError {
    fn from(err: WindowError) -> Self {
        Self::InvalidFilter(err.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidFilter(msg) => Self::Validation(msg),
            ReportError::DataFetch(e) => Self::Database(e.to_string()),
            ReportError::Unit(e) => Self::Database(e.to_string()),
            ReportError::Timeout(after) => Self::Timeout(format!("data fetch exceeded {after:?}")),
            ReportError::Render(e) => Self::Render(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banquet_shared::types::UnitId;
    use chrono::NaiveDate;

    #[test]
    fn test_app_error_mapping() {
        let invalid: AppError = ReportError::InvalidFilter("negative id".into()).into();
        assert_eq!(invalid.status_code(), 400);

        let fetch: AppError = ReportError::DataFetch(SourceError::Query("boom".into())).into();
        assert_eq!(fetch.error_code(), "DATABASE_ERROR");

        let timeout: AppError = ReportError::Timeout(Duration::from_secs(30)).into();
        assert_eq!(timeout.status_code(), 504);

        let render: AppError = ReportError::Render(RenderError::Template("missing".into())).into();
        assert_eq!(render.error_code(), "RENDER_ERROR");

        let unit: AppError = ReportError::Unit(UnitError::UnknownUnit(UnitId(9))).into();
        assert_eq!(unit.status_code(), 500);
    }

    #[test]
    fn test_window_error_is_invalid_filter() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let err: ReportError = WindowError::Inverted { start, end }.into();
        assert!(matches!(err, ReportError::InvalidFilter(_)));
    }
}
