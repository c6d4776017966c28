//! CLI entry point for the work tracker rollup tool.
//!
//! Provides subcommands for summarizing a single record collection, building
//! the combined dashboard report from an export directory or the backend,
//! and listing the resolved table names.

mod infra;
mod services;

use crate::infra::backend::BackendClient;
use crate::infra::config::TableConfig;
use crate::infra::export_dir::ExportDir;
use crate::services::record_source::{RecordKind, RecordSource};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use work_tracker_rollup::fetch::auth::ApiKey;
use work_tracker_rollup::fetch::{BasicClient, fetch_bytes};
use work_tracker_rollup::output::{append_record, print_json, print_pretty, print_top_groups};
use work_tracker_rollup::parser::{parse_records, parse_rows};
use work_tracker_rollup::records::{
    CarRecord, CctvRecord, FromRow, ModuleRecord, PicRecord, SmartLockRecord, WorkTrackerRecord,
    from_rows,
};
use work_tracker_rollup::report::publish::{upload_report, write_report};
use work_tracker_rollup::report::{Collections, DashboardReport};
use work_tracker_rollup::summary::{
    summarize_modules, summarize_smart_locks, summarize_work_trackers,
};

#[derive(Parser)]
#[command(name = "work_tracker_rollup")]
#[command(about = "Operational-status rollups for the work tracker dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one record collection from a file or URL
    Summarize {
        /// Which collection the source holds
        #[arg(value_enum)]
        kind: RecordKind,

        /// Path to a CSV/JSON export or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// PIC collection (work trackers only)
        #[arg(long)]
        pic: Option<String>,

        /// Car collection (work trackers only)
        #[arg(long)]
        cars: Option<String>,

        /// CCTV collection (work trackers only)
        #[arg(long)]
        cctv: Option<String>,

        /// CSV file to append the work tracker summary to
        #[arg(long)]
        history: Option<String>,

        /// Number of largest groups to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Build the combined dashboard report
    Report {
        /// Export directory, or the backend base URL
        #[arg(value_name = "DIR_OR_URL")]
        source: String,

        /// JSON file with table name overrides
        #[arg(long)]
        tables: Option<String>,

        /// Local path to write the report JSON to
        #[arg(short, long)]
        out: Option<String>,

        /// Optional: S3 bucket name to upload the report to
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress the report before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Show which table each record collection is read from
    ListTables {
        /// JSON file with table name overrides
        #[arg(long)]
        tables: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/work_tracker_rollup.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("work_tracker_rollup.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            kind,
            source,
            pic,
            cars,
            cctv,
            history,
            top,
        } => {
            summarize(kind, &source, pic, cars, cctv, history, top).await?;
        }
        Commands::Report {
            source,
            tables,
            out,
            s3_bucket,
            gzip,
        } => {
            let tables = TableConfig::load_or_default(tables.as_deref())?;
            let report = if source.starts_with("http") {
                build_report(&BackendClient::from_env(&source, tables)?).await?
            } else {
                build_report(&ExportDir::new(&source, tables)).await?
            };

            print_json(&report)?;

            if let Some(path) = out {
                write_report(&path, &report)?;
            }

            match s3_bucket {
                Some(bucket) if !bucket.is_empty() => {
                    let config = aws_config::load_from_env().await;
                    let s3 = aws_sdk_s3::Client::new(&config);
                    upload_report(&s3, &bucket, &report, gzip).await?;
                }
                _ => info!("S3 bucket not specified, skipping upload"),
            }
        }
        Commands::ListTables { tables } => {
            let tables = TableConfig::load_or_default(tables.as_deref())?;
            for (kind, table) in tables.iter() {
                info!(kind = ?kind, table, "Table");
            }
        }
    }

    Ok(())
}

/// Loads data from a local file path or fetches it over HTTP.
///
/// `BACKEND_API_KEY`, when set, is sent with every HTTP request.
#[tracing::instrument(skip_all, fields(source = %source))]
async fn fetcher(source: &str) -> Result<Vec<u8>> {
    if !source.starts_with("http") {
        return std::fs::read(source).with_context(|| format!("reading {source}"));
    }

    let client = BasicClient::with_timeouts()?;
    match std::env::var("BACKEND_API_KEY") {
        Ok(key) => {
            let authed = ApiKey::new(ApiKey::bearer(client, &key)?, "apikey", &key)?;
            fetch_bytes(&authed, source).await
        }
        Err(_) => fetch_bytes(&client, source).await,
    }
}

/// Loads a side collection if a source was given.
async fn load_optional<T: FromRow>(
    source: Option<&str>,
) -> Result<Option<Vec<T>>> {
    match source {
        Some(s) => Ok(Some(parse_records(&fetcher(s).await?)?)),
        None => Ok(None),
    }
}

/// Summarizes a single collection and logs the result.
#[tracing::instrument(skip(pic, cars, cctv, history))]
async fn summarize(
    kind: RecordKind,
    source: &str,
    pic: Option<String>,
    cars: Option<String>,
    cctv: Option<String>,
    history: Option<String>,
    top: usize,
) -> Result<()> {
    let bytes = fetcher(source).await?;
    let rows = parse_rows(&bytes)?;
    debug!(rows = rows.len(), "Rows decoded");

    if kind != RecordKind::WorkTrackers && (pic.is_some() || cars.is_some() || cctv.is_some()) {
        warn!("Side collections only apply to work trackers, ignoring");
    }

    match kind {
        RecordKind::WorkTrackers => {
            let records: Vec<WorkTrackerRecord> = from_rows(&rows);
            let pic: Option<Vec<PicRecord>> = load_optional(pic.as_deref()).await?;
            let cars: Option<Vec<CarRecord>> = load_optional(cars.as_deref()).await?;
            let cctv: Option<Vec<CctvRecord>> = load_optional(cctv.as_deref()).await?;

            let summary = summarize_work_trackers(
                &records,
                pic.as_deref(),
                cars.as_deref(),
                cctv.as_deref(),
            );
            print_pretty(&summary);
            print_json(&summary)?;

            if let Some(path) = history {
                append_record(&path, &summary)?;
            }
        }
        RecordKind::Modules => {
            let records: Vec<ModuleRecord> = from_rows(&rows);
            let summary = summarize_modules(&records);
            print_pretty(&summary);
            print_json(&summary)?;
            print_top_groups("region", &summary.by_region, top);
            print_top_groups("partner", &summary.by_partner, top);
        }
        RecordKind::SmartLocks => {
            let records: Vec<SmartLockRecord> = from_rows(&rows);
            let summary = summarize_smart_locks(&records);
            print_pretty(&summary);
            print_json(&summary)?;
            info!(
                installed_pct = %summary.pct_label(summary.installed),
                need_install_pct = %summary.pct_label(summary.need_install),
                need_relocated_pct = %summary.pct_label(summary.need_relocated),
                lost_pct = %summary.pct_label(summary.lost),
                long_aging_pct = %summary.pct_label(summary.long_aging),
                "Smart lock shares"
            );
            print_top_groups("region", &summary.by_region, top);
        }
        RecordKind::Pic | RecordKind::Cars | RecordKind::Cctv => {
            // Side collections only feed the work tracker rollup.
            let empty: Vec<WorkTrackerRecord> = Vec::new();
            let summary = match kind {
                RecordKind::Pic => {
                    let pic: Vec<PicRecord> = from_rows(&rows);
                    summarize_work_trackers(&empty, Some(pic.as_slice()), None, None)
                }
                RecordKind::Cars => {
                    let cars: Vec<CarRecord> = from_rows(&rows);
                    summarize_work_trackers(&empty, None, Some(cars.as_slice()), None)
                }
                _ => {
                    let cctv: Vec<CctvRecord> = from_rows(&rows);
                    summarize_work_trackers(&empty, None, None, Some(cctv.as_slice()))
                }
            };
            print_json(&summary)?;
        }
    }

    Ok(())
}

/// Loads every collection from `source` and builds the dashboard report.
#[tracing::instrument(skip(source))]
async fn build_report(source: &impl RecordSource) -> Result<DashboardReport> {
    let mut collections = Collections::default();

    for kind in RecordKind::ALL {
        let rows = source
            .load(kind)
            .await
            .with_context(|| format!("loading {kind:?}"))?;
        info!(kind = ?kind, rows = rows.len(), "Collection loaded");

        match kind {
            RecordKind::WorkTrackers => collections.work_trackers = from_rows(&rows),
            RecordKind::Pic => collections.pic = from_rows(&rows),
            RecordKind::Cars => collections.cars = from_rows(&rows),
            RecordKind::Cctv => collections.cctv = from_rows(&rows),
            RecordKind::Modules => collections.modules = from_rows(&rows),
            RecordKind::SmartLocks => collections.smart_locks = from_rows(&rows),
        }
    }

    Ok(DashboardReport::build(&collections, Utc::now()))
}
