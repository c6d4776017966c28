//! Typed domain records and the row-to-record ingestion boundary.
//!
//! Upstream data arrives as flat rows (field name → primitive value). Every
//! record type implements [`FromRow`], which resolves status aliases and
//! substitutes absent values for anything missing, null, empty or
//! wrong-typed. Nothing in here ever fails.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// A single flat record as loaded from an export or the backend.
pub type Row = Map<String, Value>;

/// Group key used when a record carries no region or partner.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Builds a typed record from a flat row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Self;
}

/// Reads `key` as text. Null, missing and blank values are absent.
///
/// Non-string primitives are rendered as text so that a status stored as a
/// number still compares (and fails to match) like any other string.
pub fn text(row: &Row, key: &str) -> Option<String> {
    let s = match row.get(key)? {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            debug!(key, value = %other, "Ignoring non-primitive field");
            return None;
        }
    };
    if s.trim().is_empty() { None } else { Some(s) }
}

/// Reads `key` as a finite number. Numeric strings are accepted.
pub fn number(row: &Row, key: &str) -> Option<f64> {
    let n = match row.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            let parsed = s.trim().parse::<f64>().ok();
            if parsed.is_none() {
                debug!(key, value = %s, "Non-numeric value treated as absent");
            }
            parsed
        }
        _ => None,
    };
    n.filter(|v| v.is_finite())
}

/// Returns the quantity or zero.
pub fn qty(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Work trackers
// ---------------------------------------------------------------------------

/// Lifecycle state of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WorkStatus {
    Open,
    OnHold,
    Close,
    Other(String),
}

impl WorkStatus {
    /// Exact match against `"Open"`, `"On Hold"` and `"Close"`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Open" => WorkStatus::Open,
            "On Hold" => WorkStatus::OnHold,
            "Close" => WorkStatus::Close,
            other => WorkStatus::Other(other.to_string()),
        }
    }
}

/// Which literal an approved BAST arrived as.
///
/// Both spellings exist in historical data and count as approved. The raw
/// form is kept so it can be consolidated upstream once the data owner agrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApprovalSpelling {
    /// `"Approve"`
    Approve,
    /// `"BAST Approve Date"`
    ApproveDate,
}

/// Status of the BAST (handover acceptance) paperwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BastStatus {
    Approved(ApprovalSpelling),
    WaitingApprove,
    Other(String),
}

impl BastStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Approve" => BastStatus::Approved(ApprovalSpelling::Approve),
            "BAST Approve Date" => BastStatus::Approved(ApprovalSpelling::ApproveDate),
            "Waiting Approve" => BastStatus::WaitingApprove,
            other => BastStatus::Other(other.to_string()),
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, BastStatus::Approved(_))
    }
}

/// A date column. Values that do not parse still count as present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecordDate {
    Date(NaiveDate),
    Unparsed(String),
}

impl RecordDate {
    /// Accepts `YYYY-MM-DD`, optionally followed by a time part
    /// (`2024-03-01T10:00:00Z`, `2024-03-01 10:00:00`).
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let date_part = trimmed.get(..10).unwrap_or(trimmed);
        match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            Ok(d) => RecordDate::Date(d),
            Err(_) => RecordDate::Unparsed(raw.to_string()),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RecordDate::Date(d) => Some(*d),
            RecordDate::Unparsed(_) => None,
        }
    }
}

/// One field-work item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkTrackerRecord {
    pub work_status: Option<WorkStatus>,
    pub bast_status: Option<BastStatus>,
    pub aging_days: Option<u32>,
    pub date_submit: Option<RecordDate>,
    pub date_approve: Option<RecordDate>,
}

impl FromRow for WorkTrackerRecord {
    fn from_row(row: &Row) -> Self {
        WorkTrackerRecord {
            work_status: text(row, "work_status").map(|s| WorkStatus::parse(&s)),
            bast_status: text(row, "bast_status").map(|s| BastStatus::parse(&s)),
            aging_days: aging_days(number(row, "aging_days")),
            date_submit: text(row, "date_submit").map(|s| RecordDate::parse(&s)),
            date_approve: text(row, "date_approve").map(|s| RecordDate::parse(&s)),
        }
    }
}

/// Fractional ages round up so that `age > n` holds exactly when it held
/// for the raw value, for any whole-day threshold `n`.
fn aging_days(raw: Option<f64>) -> Option<u32> {
    match raw {
        Some(v) if v >= 0.0 && v <= u32::MAX as f64 => Some(v.ceil() as u32),
        Some(v) => {
            debug!(value = v, "Aging days out of range treated as absent");
            None
        }
        None => None,
    }
}

// ---------------------------------------------------------------------------
// Side-channel collections
// ---------------------------------------------------------------------------

/// Active/inactive flag shared by PIC and car records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ActiveState {
    Active,
    #[default]
    Inactive,
}

impl ActiveState {
    /// `"Active"` and `"Aktif"` are both active; anything else is not.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Active" | "Aktif" => ActiveState::Active,
            _ => ActiveState::Inactive,
        }
    }

    fn from_field(row: &Row, key: &str) -> Self {
        text(row, key)
            .map(|s| ActiveState::parse(&s))
            .unwrap_or_default()
    }
}

/// Person-in-charge contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PicRecord {
    pub validation_status: ActiveState,
}

impl FromRow for PicRecord {
    fn from_row(row: &Row) -> Self {
        PicRecord {
            validation_status: ActiveState::from_field(row, "validation_status"),
        }
    }
}

/// Vehicle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarRecord {
    pub status: ActiveState,
}

impl FromRow for CarRecord {
    fn from_row(row: &Row) -> Self {
        CarRecord {
            status: ActiveState::from_field(row, "status"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Connection {
    Online,
    #[default]
    Offline,
}

impl Connection {
    /// Case-insensitive `"online"`.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("online") {
            Connection::Online
        } else {
            Connection::Offline
        }
    }
}

/// Camera unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CctvRecord {
    pub connection_status: Connection,
}

impl FromRow for CctvRecord {
    fn from_row(row: &Row) -> Self {
        CctvRecord {
            connection_status: text(row, "connection_status")
                .map(|s| Connection::parse(&s))
                .unwrap_or_default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Installation modules and smart locks
// ---------------------------------------------------------------------------

/// Installation module entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleRecord {
    pub install_status: Option<String>,
    pub rfs_status: Option<String>,
    /// `kab_kota` (regency/city).
    pub region: Option<String>,
    /// `mitra` (installation partner).
    pub partner: Option<String>,
    pub gap: Option<f64>,
    pub module_qty: Option<f64>,
    pub install_qty: Option<f64>,
}

impl ModuleRecord {
    /// Either the install or the RFS status is `"Done"`.
    pub fn is_done(&self) -> bool {
        self.install_status.as_deref() == Some("Done") || self.rfs_status.as_deref() == Some("Done")
    }

    pub fn region_key(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN_GROUP)
    }

    pub fn partner_key(&self) -> &str {
        self.partner.as_deref().unwrap_or(UNKNOWN_GROUP)
    }
}

impl FromRow for ModuleRecord {
    fn from_row(row: &Row) -> Self {
        ModuleRecord {
            install_status: text(row, "install_status"),
            rfs_status: text(row, "rfs_status"),
            region: text(row, "kab_kota"),
            partner: text(row, "mitra"),
            gap: number(row, "gap"),
            module_qty: number(row, "module_qty"),
            install_qty: number(row, "install_qty"),
        }
    }
}

/// Smart lock entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmartLockRecord {
    pub install_state: Option<String>,
    pub priority_flag: Option<String>,
    pub region: Option<String>,
}

impl SmartLockRecord {
    pub fn state(&self) -> &str {
        self.install_state.as_deref().unwrap_or("")
    }

    pub fn region_key(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN_GROUP)
    }
}

impl FromRow for SmartLockRecord {
    fn from_row(row: &Row) -> Self {
        SmartLockRecord {
            install_state: text(row, "install_state"),
            priority_flag: text(row, "priority_flag"),
            region: text(row, "region"),
        }
    }
}

/// Converts every row.
pub fn from_rows<T: FromRow>(rows: &[Row]) -> Vec<T> {
    rows.iter().map(T::from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_text_treats_blank_and_null_as_absent() {
        let r = row(json!({"a": "", "b": "   ", "c": null, "d": "x"}));
        assert_eq!(text(&r, "a"), None);
        assert_eq!(text(&r, "b"), None);
        assert_eq!(text(&r, "c"), None);
        assert_eq!(text(&r, "missing"), None);
        assert_eq!(text(&r, "d").as_deref(), Some("x"));
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        let r = row(json!({"a": 3, "b": "4.5", "c": "n/a", "d": true, "e": " 7 "}));
        assert_eq!(number(&r, "a"), Some(3.0));
        assert_eq!(number(&r, "b"), Some(4.5));
        assert_eq!(number(&r, "c"), None);
        assert_eq!(number(&r, "d"), None);
        assert_eq!(number(&r, "e"), Some(7.0));
        assert_eq!(qty(number(&r, "c")), 0.0);
    }

    #[test]
    fn test_bast_status_aliases() {
        assert!(BastStatus::parse("Approve").is_approved());
        assert!(BastStatus::parse("BAST Approve Date").is_approved());
        assert_eq!(
            BastStatus::parse("BAST Approve Date"),
            BastStatus::Approved(ApprovalSpelling::ApproveDate)
        );
        assert_eq!(BastStatus::parse("Waiting Approve"), BastStatus::WaitingApprove);
        assert!(!BastStatus::parse("approve").is_approved());
    }

    #[test]
    fn test_work_status_is_exact() {
        assert_eq!(WorkStatus::parse("On Hold"), WorkStatus::OnHold);
        assert_eq!(WorkStatus::parse("on hold"), WorkStatus::Other("on hold".into()));
    }

    #[test]
    fn test_active_state_aliases() {
        assert_eq!(ActiveState::parse("Active"), ActiveState::Active);
        assert_eq!(ActiveState::parse("Aktif"), ActiveState::Active);
        assert_eq!(ActiveState::parse("Inactive"), ActiveState::Inactive);
        assert_eq!(PicRecord::from_row(&Row::new()).validation_status, ActiveState::Inactive);
    }

    #[test]
    fn test_connection_is_case_insensitive() {
        assert_eq!(Connection::parse("Online"), Connection::Online);
        assert_eq!(Connection::parse("ONLINE"), Connection::Online);
        assert_eq!(Connection::parse("online"), Connection::Online);
        assert_eq!(Connection::parse("Offline"), Connection::Offline);
    }

    #[test]
    fn test_record_date_keeps_unparsed_values() {
        assert_eq!(
            RecordDate::parse("2024-03-01T10:00:00Z").as_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            RecordDate::parse("01/03/2024"),
            RecordDate::Unparsed("01/03/2024".into())
        );
    }

    #[test]
    fn test_work_tracker_from_row() {
        let r = row(json!({
            "work_status": "Close",
            "bast_status": null,
            "aging_days": "90.5",
            "date_submit": "",
        }));
        let rec = WorkTrackerRecord::from_row(&r);
        assert_eq!(rec.work_status, Some(WorkStatus::Close));
        assert_eq!(rec.bast_status, None);
        assert_eq!(rec.aging_days, Some(91));
        assert_eq!(rec.date_submit, None);
    }

    #[test]
    fn test_negative_aging_is_absent() {
        let r = row(json!({"aging_days": -3}));
        assert_eq!(WorkTrackerRecord::from_row(&r).aging_days, None);
    }

    #[test]
    fn test_module_from_row_uses_location_and_partner_keys() {
        let r = row(json!({"install_status": "Done", "kab_kota": "Bandung", "gap": "x"}));
        let m = ModuleRecord::from_row(&r);
        assert!(m.is_done());
        assert_eq!(m.region_key(), "Bandung");
        assert_eq!(m.partner_key(), UNKNOWN_GROUP);
        assert_eq!(m.gap, None);
    }
}
