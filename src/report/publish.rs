use anyhow::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::report::DashboardReport;

/// Object key for a report: `reports/dashboard-<YYYY-MM-DD>.json[.gz]`.
pub fn report_key(report: &DashboardReport, gzip: bool) -> String {
    let date = report.generated_at.format("%Y-%m-%d");
    let ext = if gzip { "json.gz" } else { "json" };
    format!("reports/dashboard-{date}.{ext}")
}

/// Serializes `value` as JSON, gzip-compressing it when asked.
pub fn encode_json(value: &impl Serialize, gzip: bool) -> Result<Vec<u8>> {
    let body = serde_json::to_vec_pretty(value)?;
    if !gzip {
        return Ok(body);
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    Ok(encoder.finish()?)
}

/// Writes the report as pretty JSON to a local file.
pub fn write_report(path: &str, report: &DashboardReport) -> Result<()> {
    std::fs::write(path, encode_json(report, false)?)?;
    info!(path, "Report written");
    Ok(())
}

/// Uploads the report to an S3 bucket under [`report_key`].
pub async fn upload_report(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    report: &DashboardReport,
    gzip: bool,
) -> Result<String> {
    let key = report_key(report, gzip);
    let body = encode_json(report, gzip)?;

    let mut put = client
        .put_object()
        .bucket(bucket)
        .key(&key)
        .body(body.into())
        .content_type("application/json");
    if gzip {
        put = put.content_encoding("gzip");
    }
    put.send().await?;

    info!(bucket, key = %key, "Report uploaded");
    Ok(key)
}
