//! The combined dashboard snapshot: all three rollups plus a timestamp.

pub mod publish;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::{
    CarRecord, CctvRecord, ModuleRecord, PicRecord, SmartLockRecord, WorkTrackerRecord,
};
use crate::summary::{
    ModuleSummary, SmartLockSummary, WorkTrackerSummary, summarize_modules, summarize_smart_locks,
    summarize_work_trackers,
};

/// Every collection the dashboard reads, already converted to records.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub work_trackers: Vec<WorkTrackerRecord>,
    pub pic: Vec<PicRecord>,
    pub cars: Vec<CarRecord>,
    pub cctv: Vec<CctvRecord>,
    pub modules: Vec<ModuleRecord>,
    pub smart_locks: Vec<SmartLockRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub work_trackers: WorkTrackerSummary,
    pub modules: ModuleSummary,
    pub smart_locks: SmartLockSummary,
}

impl DashboardReport {
    pub fn build(collections: &Collections, generated_at: DateTime<Utc>) -> Self {
        DashboardReport {
            generated_at,
            work_trackers: summarize_work_trackers(
                &collections.work_trackers,
                Some(collections.pic.as_slice()),
                Some(collections.cars.as_slice()),
                Some(collections.cctv.as_slice()),
            ),
            modules: summarize_modules(&collections.modules),
            smart_locks: summarize_smart_locks(&collections.smart_locks),
        }
    }
}
