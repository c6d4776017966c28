//! Decoders for record exports: JSON arrays of objects or CSV with a header row.

use anyhow::{Result, anyhow};
use serde_json::Value;

use crate::records::{FromRow, Row, from_rows};

/// Decodes raw bytes into rows.
///
/// Input whose first non-whitespace byte is `[` is read as a JSON array of
/// objects and keeps its primitive types. Anything else is read as CSV, with
/// every cell a string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or not an array of objects, or
/// if the CSV cannot be read.
pub fn parse_rows(bytes: &[u8]) -> Result<Vec<Row>> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    match first {
        None => Ok(Vec::new()),
        Some(b'[') => parse_json_rows(bytes),
        Some(_) => parse_csv_rows(bytes),
    }
}

/// Decodes bytes straight into typed records.
pub fn parse_records<T: FromRow>(bytes: &[u8]) -> Result<Vec<T>> {
    Ok(from_rows(&parse_rows(bytes)?))
}

fn parse_json_rows(bytes: &[u8]) -> Result<Vec<Row>> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Object(map) => Ok(map),
            other => Err(anyhow!("row {i} is not an object: {other}")),
        })
        .collect()
}

fn parse_csv_rows(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ModuleRecord;

    #[test]
    fn test_parse_empty_bytes_returns_no_rows() {
        assert!(parse_rows(b"").unwrap().is_empty());
        assert!(parse_rows(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_rows() {
        let rows = parse_rows(br#" [{"work_status": "Open", "aging_days": 4}]"#).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["aging_days"], Value::from(4));
    }

    #[test]
    fn test_parse_json_rejects_non_objects() {
        assert!(parse_rows(b"[1, 2]").is_err());
        assert!(parse_rows(b"[{").is_err());
    }

    #[test]
    fn test_parse_csv_rows() {
        let csv = "install_status, kab_kota\nDone,A\nPending,A\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["kab_kota"], Value::from("A"));
    }

    #[test]
    fn test_parse_records_short_csv_row() {
        let csv = "install_status,kab_kota,gap\nDone\n";
        let records: Vec<ModuleRecord> = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_done());
        assert_eq!(records[0].region, None);
    }
}
