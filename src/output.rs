//! Output formatting and persistence for summaries.
//!
//! Supports pretty-printing, JSON logging, CSV history append and
//! top-N group listings.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::summary::group::{GroupCount, ranked};
use crate::summary::utility::pct1;
use csv::WriterBuilder;
use std::fmt::Debug;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &impl Debug) {
    debug!("{:#?}", summary);
}

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Logs the `limit` largest groups under `label`, with their completion share.
pub fn print_top_groups(label: &str, groups: &[GroupCount], limit: usize) {
    for g in ranked(groups, limit) {
        info!(
            group = label,
            key = %g.key,
            total = g.total,
            completed = g.completed,
            completed_pct = pct1(g.completed, g.total),
            "Top group"
        );
    }
}

/// Appends a flat summary as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist. Only
/// summaries without nested group lists can be written this way.
pub fn append_record(path: &str, summary: &impl Serialize) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{ModuleSummary, WorkTrackerSummary};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&WorkTrackerSummary::default());
    }

    #[test]
    fn test_print_json_handles_nested_groups() {
        print_json(&ModuleSummary::default()).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("work_tracker_rollup_test_header.csv");
        let _ = fs::remove_file(&path);

        let summary = WorkTrackerSummary::default();
        append_record(&path, &summary).unwrap();
        append_record(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content
            .lines()
            .filter(|l| l.contains("completion_rate"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
