//! Spreadsheet loading and row extraction

use crate::{FillError, Result};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Range, Reader};
use chrono::Timelike;
use std::collections::BTreeMap;
use std::path::Path;

/// Column holding the applicant name used in output file names
pub const PROPERTY_OWNER: &str = "Property Owner";

/// Columns every input spreadsheet must provide, in header order
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Job Address",
    "City",
    "Tax Folio No",
    "Job Value",
    "Legal Description",
    PROPERTY_OWNER,
    "Phone",
    "Email",
    "Owners Address",
    "State",
    "Zip",
    "City_2",
];

/// Per-applicant values extracted from one spreadsheet row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowRecord {
    values: BTreeMap<String, String>,
}

impl RowRecord {
    /// Value for a canonical field name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the record carries a key, even with an empty value
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Property owner, or an empty string when the record has none
    pub fn property_owner(&self) -> &str {
        self.get(PROPERTY_OWNER).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Load every data row of the first sheet of a workbook
///
/// Accepts any format calamine can open (xlsx, xlsm, xls, ods).
pub fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RowRecord>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FillError::SpreadsheetNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| FillError::Spreadsheet(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FillError::Spreadsheet(format!("{}: no sheets found", path.display())))?
        .map_err(|e| FillError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let rows = extract_rows(&range)?;
    log::info!("loaded {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Convert a sheet (first row = headers) into row records
///
/// Only the required columns are kept. Fully blank rows are dropped.
pub fn extract_rows(range: &Range<Data>) -> Result<Vec<RowRecord>> {
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(cell_to_string).collect())
        .unwrap_or_default();

    let mut columns = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for name in REQUIRED_COLUMNS {
        let index = header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| FillError::MissingColumn(name.to_string()))?;
        columns.push((name, index));
    }

    let mut records = Vec::new();
    for cells in rows {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let record: RowRecord = columns
            .iter()
            .map(|&(name, index)| {
                let value = cells.get(index).map(cell_to_string).unwrap_or_default();
                (name, value)
            })
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Render a cell as text
///
/// Whole numbers drop their fractional part so numeric zip codes, phone
/// numbers and job values read naturally.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => excel_datetime_to_string(dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => {
            log::warn!("spreadsheet cell holds an error ({:?}); using an empty value", e);
            String::new()
        }
    }
}

/// ISO text for an Excel date cell: `2024-01-27`, or `2024-01-27T14:30:00`
/// when it carries a time of day
///
/// Durations and serials outside chrono's range keep their numeric form.
fn excel_datetime_to_string(dt: &ExcelDateTime) -> String {
    if !dt.is_datetime() {
        return dt.as_f64().to_string();
    }
    match dt.as_datetime() {
        Some(datetime) if datetime.num_seconds_from_midnight() == 0 => {
            datetime.format("%Y-%m-%d").to_string()
        }
        Some(datetime) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use pretty_assertions::assert_eq;

    fn sheet(rows: &[Vec<Data>]) -> Range<Data> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn header() -> Vec<Data> {
        REQUIRED_COLUMNS
            .iter()
            .map(|name| Data::String(name.to_string()))
            .collect()
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_extract_single_row() {
        let row = vec![
            text("12 Palm Way"),
            text("Miami"),
            text("01-2345-678"),
            Data::Float(25000.0),
            text("Lot 4 Block 2"),
            text("Jane Doe"),
            Data::Int(5551234),
            text("jane@example.com"),
            text("9 Ocean Dr"),
            text("FL"),
            Data::Float(33101.0),
            text("Miami Beach"),
        ];
        let rows = extract_rows(&sheet(&[header(), row])).unwrap();

        assert_eq!(rows.len(), 1);
        let record = &rows[0];
        assert!(REQUIRED_COLUMNS.iter().all(|c| record.contains_key(c)));
        assert_eq!(record.property_owner(), "Jane Doe");
        assert_eq!(record.get("Job Value"), Some("25000"));
        assert_eq!(record.get("Zip"), Some("33101"));
        assert_eq!(record.get("Phone"), Some("5551234"));
        assert_eq!(record.get("City_2"), Some("Miami Beach"));
    }

    #[test]
    fn test_columns_found_in_any_order_and_extras_ignored() {
        let mut head = header();
        head.reverse();
        head.push(text("Notes"));
        let mut row: Vec<Data> = REQUIRED_COLUMNS.iter().map(|c| text(c)).collect();
        row.reverse();
        row.push(text("ignored"));

        let rows = extract_rows(&sheet(&[head, row])).unwrap();
        assert_eq!(rows[0].get("Email"), Some("Email"));
        assert!(!rows[0].contains_key("Notes"));
    }

    #[test]
    fn test_missing_column() {
        let head: Vec<Data> = header()
            .into_iter()
            .filter(|h| *h != text("Tax Folio No"))
            .collect();
        let result = extract_rows(&sheet(&[head]));
        assert!(matches!(
            result,
            Err(FillError::MissingColumn(name)) if name == "Tax Folio No"
        ));
    }

    #[test]
    fn test_blank_rows_skipped_and_empty_cells_kept() {
        let blank = vec![Data::Empty; 12];
        let mut sparse = vec![Data::Empty; 12];
        sparse[5] = text("John Roe");

        let rows = extract_rows(&sheet(&[header(), blank, sparse])).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].property_owner(), "John Roe");
        assert_eq!(rows[0].get("City"), Some(""));
        assert!(rows[0].contains_key("City"));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(1234.5)), "1234.5");
        assert_eq!(cell_to_string(&Data::Float(-3.0)), "-3");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2024-01-27".to_string())),
            "2024-01-27"
        );
    }

    #[test]
    fn test_date_cells_become_iso_text() {
        let date = ExcelDateTime::new(45318.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(cell_to_string(&Data::DateTime(date)), "2024-01-27");

        let afternoon = ExcelDateTime::new(45318.5, ExcelDateTimeType::DateTime, false);
        assert_eq!(
            cell_to_string(&Data::DateTime(afternoon)),
            "2024-01-27T12:00:00"
        );
    }

    #[test]
    fn test_load_unreadable_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a workbook").unwrap();

        match load_rows(&path) {
            Err(FillError::Spreadsheet(message)) => assert!(message.contains("broken.xlsx")),
            other => panic!("expected a spreadsheet error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_spreadsheet() {
        let result = load_rows("no such workbook.xlsx");
        assert!(matches!(result, Err(FillError::SpreadsheetNotFound { .. })));
    }

    #[test]
    fn test_record_from_pairs() {
        let record: RowRecord = [("Property Owner", "Jane Doe")].into_iter().collect();
        assert_eq!(record.property_owner(), "Jane Doe");
        assert!(!record.contains_key("City"));
        assert!(RowRecord::default().property_owner().is_empty());
    }
}
