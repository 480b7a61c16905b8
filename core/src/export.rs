//! Thin serialization of derived tables to CSV and JSON.
//!
//! Accepts anything the core produces; the presentation layer owns file
//! naming and download plumbing.

use crate::aggregate::PivotTable;
use crate::error::DashboardResult;
use serde::Serialize;
use std::path::Path;

/// Write serializable records as CSV.
pub fn write_csv_rows<P: AsRef<Path>, T: Serialize>(path: P, rows: &[T]) -> DashboardResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a pivot table as CSV: first column is the row key under
/// `row_header`, missing cells serialize as empty fields.
pub fn write_pivot_csv<P: AsRef<Path>>(
    path: P,
    table: &PivotTable,
    row_header: &str,
) -> DashboardResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(table.col_keys.len() + 1);
    header.push(row_header.to_string());
    header.extend(table.col_keys.iter().cloned());
    writer.write_record(&header)?;

    for (r, row_key) in table.row_keys.iter().enumerate() {
        let mut record = Vec::with_capacity(table.col_keys.len() + 1);
        record.push(row_key.clone());
        for c in 0..table.col_keys.len() {
            record.push(match table.get(r, c) {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write any serializable value as pretty-printed JSON.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> DashboardResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
