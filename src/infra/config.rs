use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::services::record_source::RecordKind;

/// Maps record kinds to table names, falling back to the defaults.
///
/// Overrides are stored as a plain JSON object keyed by the default name:
/// ```json
/// {
///   "work_trackers": "work_tracker_2024",
///   "smart_locks": "smartlock_install"
/// }
/// ```
#[derive(Debug, Default)]
pub struct TableConfig {
    overrides: HashMap<String, String>,
}

impl TableConfig {
    /// Loads the overrides from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading table config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("parsing table config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let overrides: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { overrides })
    }

    /// Uses `path` when given, the defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// The table holding `kind`.
    pub fn table(&self, kind: RecordKind) -> &str {
        let default = kind.default_table();
        self.overrides
            .get(default)
            .map(String::as_str)
            .unwrap_or(default)
    }

    /// Iterates over all `(kind, table)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RecordKind, &str)> {
        RecordKind::ALL.into_iter().map(|k| (k, self.table(k)))
    }
}
