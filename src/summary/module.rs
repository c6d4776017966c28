use serde::Serialize;

use crate::records::{ModuleRecord, qty};
use crate::summary::group::{GroupCount, Grouper};
use crate::summary::utility::round_pct;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleSummary {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
    pub progress: u32,
    /// Keyed by `kab_kota`.
    pub by_region: Vec<GroupCount>,
    /// Keyed by `mitra`.
    pub by_partner: Vec<GroupCount>,
    pub total_gap: f64,
    pub total_module_qty: f64,
    pub total_install_qty: f64,
}

/// Rolls up installation modules. A module is done when either its install
/// or RFS status is `"Done"`.
pub fn summarize_modules(records: &[ModuleRecord]) -> ModuleSummary {
    let mut regions = Grouper::default();
    let mut partners = Grouper::default();
    let mut s = ModuleSummary {
        total: records.len(),
        ..Default::default()
    };

    for r in records {
        let done = r.is_done();
        if done {
            s.done += 1;
        }

        regions.add(r.region_key(), done);
        partners.add(r.partner_key(), done);

        s.total_gap += qty(r.gap);
        s.total_module_qty += qty(r.module_qty);
        s.total_install_qty += qty(r.install_qty);
    }

    s.pending = s.total - s.done;
    s.progress = round_pct(s.done, s.total);
    s.by_region = regions.finish();
    s.by_partner = partners.finish();
    s
}
