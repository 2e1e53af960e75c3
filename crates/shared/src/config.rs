//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Report generation settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Report generation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Decimal places used for currency amounts.
    #[serde(default = "default_currency_decimal_places")]
    pub currency_decimal_places: u32,
    /// Upper bound for a single data fetch, in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Units whose declared precision of `-1` resolves to 0 or 3 digits.
    #[serde(default = "default_auto_precision_unit_ids")]
    pub auto_precision_unit_ids: Vec<i64>,
    /// Language code passed to the renderer for the default language.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Language code for the preferred language selector.
    #[serde(default = "default_preferred_language")]
    pub preferred_language: String,
    /// Language code for the supportive language selector.
    #[serde(default = "default_supportive_language")]
    pub supportive_language: String,
    /// Time-to-live of the cached measurement table, in seconds.
    #[serde(default = "default_measurement_cache_ttl_secs")]
    pub measurement_cache_ttl_secs: u64,
}

fn default_currency_decimal_places() -> u32 {
    2
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_auto_precision_unit_ids() -> Vec<i64> {
    vec![1, 3]
}

fn default_language() -> String {
    "en".to_string()
}

fn default_preferred_language() -> String {
    "gu".to_string()
}

fn default_supportive_language() -> String {
    "hi".to_string()
}

fn default_measurement_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_decimal_places: default_currency_decimal_places(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            auto_precision_unit_ids: default_auto_precision_unit_ids(),
            default_language: default_language(),
            preferred_language: default_preferred_language(),
            supportive_language: default_supportive_language(),
            measurement_cache_ttl_secs: default_measurement_cache_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("BANQUET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("report.auto_precision_unit_ids")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_defaults() {
        let report = ReportConfig::default();
        assert_eq!(report.currency_decimal_places, 2);
        assert_eq!(report.fetch_timeout_secs, 30);
        assert_eq!(report.auto_precision_unit_ids, vec![1, 3]);
        assert_eq!(report.default_language, "en");
        assert_eq!(report.measurement_cache_ttl_secs, 300);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("BANQUET__DATABASE__URL", Some("postgres://localhost/banquet")),
                ("BANQUET__REPORT__CURRENCY_DECIMAL_PLACES", Some("3")),
                ("BANQUET__REPORT__AUTO_PRECISION_UNIT_IDS", Some("1,3,9")),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/banquet");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.report.currency_decimal_places, 3);
                assert_eq!(config.report.auto_precision_unit_ids, vec![1, 3, 9]);
                assert_eq!(config.report.fetch_timeout_secs, 30);
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("BANQUET__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
