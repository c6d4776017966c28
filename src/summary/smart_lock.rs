use serde::Serialize;

use crate::records::SmartLockRecord;
use crate::summary::group::{GroupCount, Grouper};
use crate::summary::utility::{pct1, round_pct};

/// Priority flag marking a lock stuck in a long-running issue.
pub const LONG_AGING_FLAG: &str = "Issue Long Aging";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SmartLockSummary {
    pub total: usize,
    pub installed: usize,
    pub need_install: usize,
    pub need_relocated: usize,
    pub lost: usize,
    pub long_aging: usize,
    pub progress: u32,
    pub by_region: Vec<GroupCount>,
}

impl SmartLockSummary {
    /// Share of `count` in the total, rounded to one decimal place.
    pub fn pct(&self, count: usize) -> f64 {
        pct1(count, self.total)
    }

    /// [`Self::pct`] rendered with exactly one decimal, e.g. `"33.3"`.
    pub fn pct_label(&self, count: usize) -> String {
        format!("{:.1}", self.pct(count))
    }
}

/// Rolls up smart locks.
///
/// `"NEED INSTALL"` and `"LOST"` match anywhere inside the install state;
/// `"INSTALLED"` and `"NEED RELOCATED"` must match exactly.
pub fn summarize_smart_locks(records: &[SmartLockRecord]) -> SmartLockSummary {
    let mut regions = Grouper::default();
    let mut s = SmartLockSummary {
        total: records.len(),
        ..Default::default()
    };

    for r in records {
        let state = r.state();
        let installed = state == "INSTALLED";

        if installed {
            s.installed += 1;
        }

        if state.contains("NEED INSTALL") {
            s.need_install += 1;
        }

        if state == "NEED RELOCATED" {
            s.need_relocated += 1;
        }

        if state.contains("LOST") {
            s.lost += 1;
        }

        if r.priority_flag.as_deref() == Some(LONG_AGING_FLAG) {
            s.long_aging += 1;
        }

        regions.add(r.region_key(), installed);
    }

    s.progress = round_pct(s.installed, s.total);
    s.by_region = regions.finish();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::group::find;

    fn lock(state: &str) -> SmartLockRecord {
        SmartLockRecord {
            install_state: Some(state.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input() {
        let s = summarize_smart_locks(&[]);
        assert_eq!(s.progress, 0);
        assert_eq!(s.pct(0), 0.0);
        assert_eq!(s.pct_label(0), "0.0");
    }

    #[test]
    fn test_containment_matching() {
        let s = summarize_smart_locks(&[
            lock("INSTALLED"),
            lock("NEED INSTALL URGENT"),
            lock("LOST/BROKEN"),
        ]);

        assert_eq!(s.total, 3);
        assert_eq!(s.installed, 1);
        assert_eq!(s.need_install, 1);
        assert_eq!(s.lost, 1);
        assert_eq!(s.progress, 33);
    }

    #[test]
    fn test_exact_states() {
        let s = summarize_smart_locks(&[
            lock("INSTALLED OK"),
            lock("NEED RELOCATED"),
            lock("NEED RELOCATED LATER"),
            lock("installed"),
        ]);
        assert_eq!(s.installed, 0);
        assert_eq!(s.need_relocated, 1);
    }

    #[test]
    fn test_long_aging_flag_is_exact() {
        let mut a = lock("INSTALLED");
        a.priority_flag = Some(LONG_AGING_FLAG.to_string());
        let mut b = lock("INSTALLED");
        b.priority_flag = Some("issue long aging".to_string());

        let s = summarize_smart_locks(&[a, b, SmartLockRecord::default()]);
        assert_eq!(s.long_aging, 1);
        assert_eq!(s.installed, 2);
    }

    #[test]
    fn test_pct_keeps_one_decimal() {
        let s = summarize_smart_locks(&[lock("INSTALLED"), lock("LOST"), lock("LOST")]);
        assert_eq!(s.pct(s.installed), 33.3);
        assert_eq!(s.pct(s.lost), 66.7);
        assert_eq!(s.pct_label(s.lost), "66.7");
        assert_eq!(s.pct(s.total), 100.0);
    }

    #[test]
    fn test_region_breakdown() {
        let mut a = lock("INSTALLED");
        a.region = Some("Jakarta".into());
        let mut b = lock("NEED INSTALL");
        b.region = Some("Jakarta".into());
        let c = lock("INSTALLED");

        let s = summarize_smart_locks(&[a, b, c]);
        let jakarta = find(&s.by_region, "Jakarta").unwrap();
        assert_eq!((jakarta.total, jakarta.completed), (2, 1));
        assert_eq!(find(&s.by_region, "Unknown").unwrap().completed, 1);
        assert_eq!(s.by_region.iter().map(|g| g.total).sum::<usize>(), s.total);
    }
}
