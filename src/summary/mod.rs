//! Derived operational-status rollups for the dashboard cards.
//!
//! Each variant is a pure function over an already-loaded slice of typed
//! records. No I/O, no shared state, and no failure path: absent values are
//! zeroes by the time they reach here.

pub mod group;
pub mod module;
pub mod smart_lock;
pub mod utility;
pub mod work_tracker;

pub use group::GroupCount;
pub use module::{ModuleSummary, summarize_modules};
pub use smart_lock::{SmartLockSummary, summarize_smart_locks};
pub use work_tracker::{WorkTrackerSummary, summarize_work_trackers};
