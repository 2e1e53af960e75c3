//! Report assembly service.
//!
//! Fetches transactions through a [`LedgerSource`], composes rows, substitutes
//! the placeholder row for an empty result and hands the rows to a
//! [`ReportRenderer`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use banquet_shared::ReportConfig;
use banquet_shared::types::{EntityId, LanguageSelector, UnitId};
use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use super::composer::{ReportComposer, display_name};
use super::error::ReportError;
use super::render::{RenderedDocument, ReportParameters, ReportRenderer};
use super::source::{LedgerSource, SourceQuery};
use super::types::{EntityFilter, LedgerRow, ReportKind, ReportProfile, ReportRequest};
use crate::units::{PrecisionPolicy, UnitTable};

/// Runtime settings of the report service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    /// Decimal places of currency amounts.
    pub currency_decimal_places: u32,
    /// Upper bound for each data fetch.
    pub fetch_timeout: Duration,
    /// Language code for [`LanguageSelector::Default`].
    pub default_language: String,
    /// Language code for [`LanguageSelector::Preferred`].
    pub preferred_language: String,
    /// Language code for [`LanguageSelector::Supportive`].
    pub supportive_language: String,
}

impl ReportSettings {
    /// Language code passed to the renderer.
    #[must_use]
    pub fn language_code(&self, selector: LanguageSelector) -> &str {
        match selector {
            LanguageSelector::Default => &self.default_language,
            LanguageSelector::Preferred => &self.preferred_language,
            LanguageSelector::Supportive => &self.supportive_language,
        }
    }
}

impl From<&ReportConfig> for ReportSettings {
    fn from(config: &ReportConfig) -> Self {
        Self {
            currency_decimal_places: config.currency_decimal_places,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            default_language: config.default_language.clone(),
            preferred_language: config.preferred_language.clone(),
            supportive_language: config.supportive_language.clone(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

/// Service generating ledger reports.
pub struct ReportService<S, R> {
    source: S,
    renderer: R,
    composer: ReportComposer,
    settings: ReportSettings,
}

impl<S: LedgerSource, R: ReportRenderer> ReportService<S, R> {
    /// Creates a service.
    #[must_use]
    pub fn new(
        source: S,
        renderer: R,
        units: Arc<UnitTable>,
        precision: PrecisionPolicy,
        settings: ReportSettings,
    ) -> Self {
        let composer = ReportComposer::new(units, precision, settings.currency_decimal_places);
        Self {
            source,
            renderer,
            composer,
            settings,
        }
    }

    /// Creates a service from the `[report]` configuration section.
    #[must_use]
    pub fn from_config(source: S, renderer: R, units: Arc<UnitTable>, config: &ReportConfig) -> Self {
        let precision = PrecisionPolicy::new(config.auto_precision_unit_ids.iter().copied().map(UnitId));
        Self::new(source, renderer, units, precision, ReportSettings::from(config))
    }

    /// Data source in use.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Generates the rows of one report.
    ///
    /// An empty result yields exactly one placeholder row.
    ///
    /// # Errors
    ///
    /// `InvalidFilter` before any fetch, `Timeout` or `DataFetch` when the
    /// source fails, `Unit` when quantities cannot be reconciled.
    #[instrument(skip_all, fields(report = %kind, filter = request.entity_filter_id))]
    pub async fn generate(
        &self,
        kind: ReportKind,
        request: &ReportRequest,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        request.validate()?;
        let profile = kind.profile();
        let filter = request.filter(profile.filter_target)?;
        let query = SourceQuery {
            source: profile.source,
            grouping: profile.grouping,
            filter,
            until: request.window.end(),
        };

        let started = Instant::now();
        let transactions = self
            .with_timeout(self.source.fetch_transactions(&query))
            .await??;
        debug!(
            transactions = transactions.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Fetched report transactions"
        );

        let rows = self.composer.compose(&profile, request, transactions)?;
        if !rows.is_empty() {
            info!(rows = rows.len(), "Report composed");
            return Ok(rows);
        }

        let placeholder = self.placeholder(&profile, request, &filter).await?;
        info!("Report empty, returning placeholder row");
        Ok(vec![placeholder])
    }

    /// Validates raw parameters and generates `kind`.
    pub async fn generate_ledger_report(
        &self,
        kind: ReportKind,
        entity_filter_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        let request = ReportRequest::new(entity_filter_id, start, end, language)?;
        self.generate(kind, &request).await
    }

    /// Generates a report and renders it.
    ///
    /// # Errors
    ///
    /// Any error of [`Self::generate`], or `Render` when the renderer fails.
    pub async fn render_report(
        &self,
        kind: ReportKind,
        request: &ReportRequest,
    ) -> Result<RenderedDocument, ReportError> {
        let rows = self.generate(kind, request).await?;
        let profile = kind.profile();
        let parameters = self.parameters(&profile, request);
        self.renderer
            .render(&rows, &parameters, profile.template_id)
            .map_err(|e| {
                warn!(report = %kind, error = %e, "Rendering failed");
                ReportError::Render(e)
            })
    }

    /// Parameter map for one report invocation.
    #[must_use]
    pub fn parameters(&self, profile: &ReportProfile, request: &ReportRequest) -> ReportParameters {
        ReportParameters::build(
            profile,
            request,
            self.settings.currency_decimal_places,
            self.settings.language_code(request.language),
        )
    }

    // ========================================================================
    // Per-report entry points
    // ========================================================================

    /// General ledger of one contact (`0` for all).
    pub async fn general_ledger(
        &self,
        contact_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::GeneralLedger, contact_id, start, end, language)
            .await
    }

    /// Cash book.
    pub async fn cash_book(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::CashBook, 0, start, end, language)
            .await
    }

    /// Bank book of one bank contact (`0` for all).
    pub async fn bank_book(
        &self,
        bank_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::BankBook, bank_id, start, end, language)
            .await
    }

    /// Raw material movements.
    pub async fn daily_activity_stock(
        &self,
        raw_material_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(
            ReportKind::DailyActivityStock,
            raw_material_id,
            start,
            end,
            language,
        )
        .await
    }

    /// Contact movements.
    pub async fn daily_activity_account(
        &self,
        contact_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(
            ReportKind::DailyActivityAccount,
            contact_id,
            start,
            end,
            language,
        )
        .await
    }

    /// Totals per contact of one category (`0` for all).
    pub async fn group_summary(
        &self,
        category_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::GroupSummary, category_id, start, end, language)
            .await
    }

    /// Receipts.
    pub async fn collection(
        &self,
        contact_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::Collection, contact_id, start, end, language)
            .await
    }

    /// Sales register.
    pub async fn gst_sales(
        &self,
        contact_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::GstSales, contact_id, start, end, language)
            .await
    }

    /// Purchase register.
    pub async fn gst_purchase(
        &self,
        contact_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(ReportKind::GstPurchase, contact_id, start, end, language)
            .await
    }

    /// Crockery issued and returned, per item.
    pub async fn crockery_with_quantity(
        &self,
        crockery_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(
            ReportKind::CrockeryWithQuantity,
            crockery_id,
            start,
            end,
            language,
        )
        .await
    }

    /// General fix allocations, per raw material.
    pub async fn general_fix_with_quantity(
        &self,
        raw_material_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        language: LanguageSelector,
    ) -> Result<Vec<LedgerRow>, ReportError> {
        self.generate_ledger_report(
            ReportKind::GeneralFixWithQuantity,
            raw_material_id,
            start,
            end,
            language,
        )
        .await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn with_timeout<F: Future>(&self, fut: F) -> Result<F::Output, ReportError> {
        let limit = self.settings.fetch_timeout;
        tokio::time::timeout(limit, fut).await.map_err(|_| {
            warn!(timeout = ?limit, "Report data fetch timed out");
            ReportError::Timeout(limit)
        })
    }

    async fn placeholder(
        &self,
        profile: &ReportProfile,
        request: &ReportRequest,
        filter: &EntityFilter,
    ) -> Result<LedgerRow, ReportError> {
        let name = self
            .with_timeout(self.source.entity_name(profile.grouping, filter))
            .await??
            .map(|name| display_name(&name, request.language))
            .unwrap_or_default();
        let entity_id = filter.entity_id.unwrap_or(EntityId(0));

        Ok(LedgerRow::placeholder(entity_id, name, request.window.start()))
    }
}
