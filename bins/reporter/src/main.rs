//! Banquet report generator.
//!
//! Generates one ledger report against the configured database and writes
//! the rendered document to a file or stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use banquet_core::reports::{
    JsonRenderer, ReportError, ReportKind, ReportRequest, ReportService,
};
use banquet_db::{LedgerSourceRepository, MeasurementRepository, connect};
use banquet_shared::{AppConfig, AppError};
use banquet_shared::types::LanguageSelector;
use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a catering ledger report.
#[derive(Debug, Parser)]
#[command(name = "banquet", version, about)]
struct Cli {
    /// Report to generate, e.g. `general_ledger`, `cash_book`, `gst_sales`.
    report: String,

    /// Contact, bank, item or category id; 0 selects everything.
    #[arg(long, default_value_t = 0)]
    id: i64,

    /// First day of the window (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the window (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// 0 = default, 1 = preferred, 2 = supportive language.
    #[arg(long, default_value_t = 0)]
    language: i32,

    /// Output file; stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

/// Exit status for a rejected request; other failures exit with 1.
const USAGE_EXIT: u8 = 2;

/// Logs a report failure and picks the exit status.
fn report_failure(err: ReportError) -> ExitCode {
    let err = AppError::from(err);
    error!(
        code = err.error_code(),
        status = err.status_code(),
        error = %err,
        "Report failed"
    );
    if err.is_client_error() {
        ExitCode::from(USAGE_EXIT)
    } else {
        ExitCode::FAILURE
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banquet=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let parsed = cli.report.parse::<ReportKind>().and_then(|kind| {
        let request = ReportRequest::new(
            cli.id,
            cli.from,
            cli.to,
            LanguageSelector::from(cli.language),
        )?;
        Ok((kind, request))
    });
    let (kind, request) = match parsed {
        Ok(parsed) => parsed,
        Err(err) => return Ok(report_failure(err)),
    };

    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = connect(&config.database).await?;

    let measurements = MeasurementRepository::new(
        db.clone(),
        Duration::from_secs(config.report.measurement_cache_ttl_secs),
    );
    let units = measurements.unit_table().await?;

    let service = ReportService::from_config(
        LedgerSourceRepository::new(db),
        JsonRenderer::new(cli.pretty),
        units,
        &config.report,
    );
    let document = match service.render_report(kind, &request).await {
        Ok(document) => document,
        Err(err) => return Ok(report_failure(err)),
    };
    info!(
        report = %kind,
        template = %document.template_id,
        bytes = document.bytes.len(),
        "Report rendered"
    );

    match cli.output {
        Some(path) => std::fs::write(&path, &document.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => std::io::stdout().write_all(&document.bytes)?,
    }

    Ok(ExitCode::SUCCESS)
}
