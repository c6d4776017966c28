use serde::Serialize;

use crate::records::{
    ActiveState, BastStatus, CarRecord, CctvRecord, Connection, PicRecord, WorkStatus,
    WorkTrackerRecord,
};
use crate::summary::utility::round_pct;

/// Work-in-progress older than this many days is outstanding.
pub const WIP_AGING_DAYS: u32 = 90;

/// A BAST waiting for approval longer than this many days is outstanding.
pub const BAST_AGING_DAYS: u32 = 14;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkTrackerSummary {
    pub total: usize,

    // work status
    pub open: usize,
    pub on_hold: usize,
    pub close: usize,
    pub completion_rate: u32,

    // BAST paperwork
    pub bast_approved: usize,
    pub bast_waiting: usize,
    pub bast_need_create: usize,

    // aging
    pub outstanding_wip: usize,
    pub outstanding_bast: usize,

    // side-channel collections
    pub total_pic: usize,
    pub active_pic: usize,
    pub total_cars: usize,
    pub active_cars: usize,
    pub total_cctv: usize,
    pub cctv_online: usize,
}

/// Rolls up work trackers plus the optional PIC, car and CCTV collections.
///
/// An omitted collection contributes zero to its counters.
pub fn summarize_work_trackers(
    records: &[WorkTrackerRecord],
    pic: Option<&[PicRecord]>,
    cars: Option<&[CarRecord]>,
    cctv: Option<&[CctvRecord]>,
) -> WorkTrackerSummary {
    let mut s = WorkTrackerSummary {
        total: records.len(),
        ..Default::default()
    };

    for r in records {
        match &r.work_status {
            Some(WorkStatus::Open) => s.open += 1,
            Some(WorkStatus::OnHold) => s.on_hold += 1,
            Some(WorkStatus::Close) => s.close += 1,
            _ => {}
        }

        let approved = r.bast_status.as_ref().is_some_and(BastStatus::is_approved);
        let waiting = r.bast_status == Some(BastStatus::WaitingApprove);

        if approved {
            s.bast_approved += 1;
        }

        if waiting {
            s.bast_waiting += 1;
        }

        if needs_bast(r) {
            s.bast_need_create += 1;
        }

        let on_hold = r.work_status == Some(WorkStatus::OnHold);
        if !approved && (aged_over(r.aging_days, WIP_AGING_DAYS) || on_hold) {
            s.outstanding_wip += 1;
        }

        if waiting && aged_over(r.aging_days, BAST_AGING_DAYS) {
            s.outstanding_bast += 1;
        }
    }

    s.completion_rate = round_pct(s.close, s.total);

    let pic = pic.unwrap_or_default();
    s.total_pic = pic.len();
    s.active_pic = pic
        .iter()
        .filter(|p| p.validation_status == ActiveState::Active)
        .count();

    let cars = cars.unwrap_or_default();
    s.total_cars = cars.len();
    s.active_cars = cars
        .iter()
        .filter(|c| c.status == ActiveState::Active)
        .count();

    let cctv = cctv.unwrap_or_default();
    s.total_cctv = cctv.len();
    s.cctv_online = cctv
        .iter()
        .filter(|c| c.connection_status == Connection::Online)
        .count();

    s
}

/// Closed work with no BAST paperwork started at all.
fn needs_bast(r: &WorkTrackerRecord) -> bool {
    r.work_status == Some(WorkStatus::Close)
        && r.bast_status.is_none()
        && r.date_submit.is_none()
        && r.date_approve.is_none()
}

/// An absent age never crosses a threshold.
fn aged_over(aging_days: Option<u32>, threshold: u32) -> bool {
    aging_days.is_some_and(|d| d > threshold)
}
