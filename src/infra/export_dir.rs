use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;
use work_tracker_rollup::parser::parse_rows;
use work_tracker_rollup::records::Row;

use crate::infra::config::TableConfig;
use crate::services::record_source::{RecordKind, RecordSource};

/// Reads table exports from a local directory.
///
/// Each table is `<dir>/<table>.json` or `<dir>/<table>.csv`; JSON wins when
/// both exist. A table with no file is an empty collection.
pub struct ExportDir {
    dir: PathBuf,
    tables: TableConfig,
}

impl ExportDir {
    pub fn new(dir: impl Into<PathBuf>, tables: TableConfig) -> Self {
        Self {
            dir: dir.into(),
            tables,
        }
    }

    fn locate(&self, table: &str) -> Option<PathBuf> {
        ["json", "csv"]
            .iter()
            .map(|ext| self.dir.join(format!("{table}.{ext}")))
            .find(|p| p.is_file())
    }
}

#[async_trait]
impl RecordSource for ExportDir {
    async fn load(&self, kind: RecordKind) -> Result<Vec<Row>> {
        let table = self.tables.table(kind);
        let Some(path) = self.locate(table) else {
            debug!(table, dir = %self.dir.display(), "No export found, treating as empty");
            return Ok(Vec::new());
        };

        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let rows = parse_rows(&bytes).with_context(|| format!("decoding {}", path.display()))?;
        debug!(table, rows = rows.len(), "Export loaded");
        Ok(rows)
    }
}
