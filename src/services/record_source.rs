//! Trait and types for loading record collections from a store.

use anyhow::Result;
use clap::ValueEnum;
use work_tracker_rollup::records::Row;

/// The record collections the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum RecordKind {
    WorkTrackers,
    Pic,
    Cars,
    Cctv,
    Modules,
    SmartLocks,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::WorkTrackers,
        RecordKind::Pic,
        RecordKind::Cars,
        RecordKind::Cctv,
        RecordKind::Modules,
        RecordKind::SmartLocks,
    ];

    /// Table name used when no override is configured.
    pub fn default_table(self) -> &'static str {
        match self {
            RecordKind::WorkTrackers => "work_trackers",
            RecordKind::Pic => "pic",
            RecordKind::Cars => "cars",
            RecordKind::Cctv => "cctv",
            RecordKind::Modules => "modules",
            RecordKind::SmartLocks => "smart_locks",
        }
    }
}

/// Abstraction over wherever record collections live (an export directory,
/// the backend's REST gateway).
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns every row of the collection, in store order.
    async fn load(&self, kind: RecordKind) -> Result<Vec<Row>>;
}
