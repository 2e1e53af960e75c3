//! Renderer contract and report parameter map.
//!
//! Rendering turns `rows + parameters + template id` into a binary document.
//! Renderers must be deterministic and must not modify the rows.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use super::types::{LedgerRow, ReportProfile, ReportRequest};

/// Window start, `YYYY-MM-DD` or null.
pub const START_DATE: &str = "START_DATE";
/// Window end, `YYYY-MM-DD` or null.
pub const END_DATE: &str = "END_DATE";
/// Decimal places of currency amounts.
pub const DECIMAL_LIMIT_FOR_CURRENCY: &str = "DECIMAL_LIMIT_FOR_CURRENCY";
/// Number pattern with no decimals.
pub const ZERO_DECIMAL: &str = "ZERO_DECIMAL";
/// Number pattern with one decimal.
pub const ONE_DECIMAL: &str = "ONE_DECIMAL";
/// Number pattern with two decimals.
pub const TWO_DECIMAL: &str = "TWO_DECIMAL";
/// Number pattern with three decimals.
pub const THREE_DECIMAL: &str = "THREE_DECIMAL";
/// Number pattern with four decimals.
pub const FOUR_DECIMAL: &str = "FOUR_DECIMAL";
/// Language code of the selected translation.
pub const LANGUAGE: &str = "LANGUAGE";
/// Report title.
pub const REPORT_TITLE: &str = "REPORT_TITLE";

/// Errors raised by a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Template missing or unusable.
    #[error("Template error: {0}")]
    Template(String),

    /// Rows or parameters could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Parameters passed to the template, in deterministic key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportParameters(BTreeMap<String, Value>);

impl ReportParameters {
    /// Standard parameters of one report invocation.
    #[must_use]
    pub fn build(
        profile: &ReportProfile,
        request: &ReportRequest,
        currency_decimal_places: u32,
        language_code: &str,
    ) -> Self {
        let date = |d: Option<chrono::NaiveDate>| {
            d.map_or(Value::Null, |d| Value::String(d.format("%Y-%m-%d").to_string()))
        };

        let mut params = Self::default();
        params.insert(START_DATE, date(request.window.start()));
        params.insert(END_DATE, date(request.window.end()));
        params.insert(DECIMAL_LIMIT_FOR_CURRENCY, json!(currency_decimal_places));
        for (key, pattern) in [
            (ZERO_DECIMAL, "#,##0"),
            (ONE_DECIMAL, "#,##0.0"),
            (TWO_DECIMAL, "#,##0.00"),
            (THREE_DECIMAL, "#,##0.000"),
            (FOUR_DECIMAL, "#,##0.0000"),
        ] {
            params.insert(key, json!(pattern));
        }
        params.insert(LANGUAGE, json!(language_code));
        params.insert(REPORT_TITLE, json!(profile.title));
        params
    }

    /// Sets a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Reads a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Template the document was produced from.
    pub template_id: String,
    /// MIME type of `bytes`.
    pub content_type: String,
    /// Document body.
    pub bytes: Bytes,
}

/// Document renderer.
pub trait ReportRenderer: Send + Sync {
    /// Renders `rows` with `parameters` into the template `template_id`.
    fn render(
        &self,
        rows: &[LedgerRow],
        parameters: &ReportParameters,
        template_id: &str,
    ) -> Result<RenderedDocument, RenderError>;
}

/// Renderer emitting rows and parameters as a JSON document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Creates a renderer; `pretty` indents the output.
    #[must_use]
    pub const fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    template_id: &'a str,
    parameters: &'a ReportParameters,
    rows: &'a [LedgerRow],
}

impl ReportRenderer for JsonRenderer {
    fn render(
        &self,
        rows: &[LedgerRow],
        parameters: &ReportParameters,
        template_id: &str,
    ) -> Result<RenderedDocument, RenderError> {
        if template_id.trim().is_empty() {
            return Err(RenderError::Template("template id is empty".to_string()));
        }

        let document = JsonDocument {
            template_id,
            parameters,
            rows,
        };
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        }
        .map_err(|e| RenderError::Serialization(e.to_string()))?;

        Ok(RenderedDocument {
            template_id: template_id.to_string(),
            content_type: "application/json".to_string(),
            bytes: Bytes::from(encoded),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::types::ReportKind;
    use banquet_shared::types::{EntityId, LanguageSelector};
    use chrono::NaiveDate;

    fn request() -> ReportRequest {
        ReportRequest::new(
            0,
            NaiveDate::from_ymd_opt(2025, 4, 1),
            None,
            LanguageSelector::Preferred,
        )
        .unwrap()
    }

    #[test]
    fn test_standard_parameters() {
        let params = ReportParameters::build(&ReportKind::CashBook.profile(), &request(), 2, "gu");
        assert_eq!(params.get(START_DATE), Some(&json!("2025-04-01")));
        assert_eq!(params.get(END_DATE), Some(&Value::Null));
        assert_eq!(params.get(DECIMAL_LIMIT_FOR_CURRENCY), Some(&json!(2)));
        assert_eq!(params.get(ZERO_DECIMAL), Some(&json!("#,##0")));
        assert_eq!(params.get(FOUR_DECIMAL), Some(&json!("#,##0.0000")));
        assert_eq!(params.get(LANGUAGE), Some(&json!("gu")));
        assert_eq!(params.get(REPORT_TITLE), Some(&json!("Cash Book")));
        assert_eq!(params.len(), 10);
    }

    #[test]
    fn test_json_renderer_is_deterministic() {
        let params = ReportParameters::build(&ReportKind::GeneralLedger.profile(), &request(), 2, "en");
        let rows = vec![LedgerRow::placeholder(EntityId(4), "Ramesh Caterers", None)];
        let renderer = JsonRenderer::default();

        let first = renderer.render(&rows, &params, "general_ledger").unwrap();
        let second = renderer.render(&rows, &params, "general_ledger").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.content_type, "application/json");

        let decoded: Value = serde_json::from_slice(&first.bytes).unwrap();
        assert_eq!(decoded["template_id"], "general_ledger");
        assert_eq!(decoded["rows"][0]["entity_name"], "Ramesh Caterers");
        assert_eq!(decoded["parameters"]["LANGUAGE"], "en");
    }

    #[test]
    fn test_empty_template_rejected() {
        let result = JsonRenderer::new(true).render(&[], &ReportParameters::default(), " ");
        assert!(matches!(result, Err(RenderError::Template(_))));
    }
}
