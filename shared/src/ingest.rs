//! Table decoders feeding the normalizer
//!
//! Accepted shapes:
//! - CSV with a header row naming the export columns
//! - JSON: an array of row objects, or `{"Inventory_Data": [...]}`
//! - Excel workbooks (`.xlsx`, `.xls`): the first sheet, header row first

use std::borrow::Cow;
use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{IngestError, IngestResult};
use crate::models::InventoryRecord;
use crate::normalize::{columns, normalize_rows, RawRow, RawValue};

/// Key wrapping the row array in the dataset export
pub const DATASET_KEY: &str = "Inventory_Data";

/// Encoding of an uploaded table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
    /// Excel workbook, either `.xlsx` or legacy `.xls`
    Xlsx,
}

impl TableFormat {
    /// Guess from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Csv => write!(f, "csv"),
            TableFormat::Json => write!(f, "json"),
            TableFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(TableFormat::Csv),
            "json" => Ok(TableFormat::Json),
            "xlsx" | "xls" | "excel" => Ok(TableFormat::Xlsx),
            other => Err(format!("unsupported table format '{}'", other)),
        }
    }
}

/// Decode CSV rows. Short or long rows are tolerated and cells that are not
/// valid UTF-8 are decoded lossily; only a broken stream or an undecodable
/// header row fails.
pub fn read_csv_rows<R: Read>(reader: R) -> IngestResult<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    log_known_columns(headers.iter());

    let mut rows = Vec::new();
    let mut lossy_cells = 0usize;
    for result in csv_reader.byte_records() {
        let record = result?;
        let mut row = RawRow::new();
        for (header, bytes) in headers.iter().zip(record.iter()) {
            let cell = String::from_utf8_lossy(bytes);
            if matches!(cell, Cow::Owned(_)) {
                lossy_cells += 1;
            }
            row.insert(header, RawValue::from_cell(&cell));
        }
        rows.push(row);
    }

    if lossy_cells > 0 {
        tracing::warn!(lossy_cells, "Replaced invalid UTF-8 in CSV cells");
    }

    Ok(rows)
}

/// Decode JSON rows from either accepted shape
pub fn read_json_rows(bytes: &[u8]) -> IngestResult<Vec<RawRow>> {
    let value: Value = serde_json::from_slice(bytes)?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get(DATASET_KEY) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(IngestError::not_a_table(format!(
                    "'{}' is not an array",
                    DATASET_KEY
                )))
            }
            None => {
                return Err(IngestError::not_a_table(format!(
                    "expected an array of rows or an object with '{}'",
                    DATASET_KEY
                )))
            }
        },
        _ => {
            return Err(IngestError::not_a_table(
                "expected an array of rows or an object",
            ))
        }
    };

    // A row that is not an object still becomes a record, with every field defaulted
    let mut malformed = 0usize;
    let rows: Vec<RawRow> = items
        .iter()
        .map(|item| {
            RawRow::from_json_object(item).unwrap_or_else(|| {
                malformed += 1;
                RawRow::new()
            })
        })
        .collect();

    if malformed > 0 {
        tracing::warn!(malformed, rows = rows.len(), "JSON rows that are not objects were defaulted");
    }
    if let Some(first) = items.iter().find_map(Value::as_object) {
        log_known_columns(first.keys().map(String::as_str));
    }

    Ok(rows)
}

/// Decode the first sheet of an Excel workbook. The first row holds the
/// column headers; rows with no cells at all are skipped.
pub fn read_workbook_rows(bytes: &[u8]) -> IngestResult<Vec<RawRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(IngestError::not_a_table("workbook has no sheets")),
    };

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| workbook_cell(cell).as_text().unwrap_or_default())
            .collect(),
        None => return Ok(Vec::new()),
    };
    log_known_columns(headers.iter().map(String::as_str));

    let rows = sheet_rows
        .filter(|cells| cells.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|cells| {
            let mut row = RawRow::new();
            for (header, cell) in headers.iter().zip(cells) {
                if !header.trim().is_empty() {
                    row.insert(header, workbook_cell(cell));
                }
            }
            row
        })
        .collect();

    Ok(rows)
}

/// Map a spreadsheet cell onto the loose cell model. Date cells become
/// `YYYY-MM-DD hh:mm:ss` text; error cells carry nothing.
pub fn workbook_cell(cell: &Data) -> RawValue {
    match cell {
        Data::String(s) => RawValue::from_cell(s),
        Data::Float(f) => match Decimal::try_from(*f) {
            Ok(d) => RawValue::Number(d),
            Err(_) => RawValue::Text(f.to_string()),
        },
        Data::Int(i) => RawValue::Number(Decimal::from(*i)),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => RawValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => RawValue::Text(dt.as_f64().to_string()),
        },
        Data::DateTimeIso(s) => RawValue::from_cell(s),
        Data::DurationIso(s) => RawValue::from_cell(s),
        Data::Error(_) => RawValue::Empty,
        Data::Empty => RawValue::Empty,
    }
}

/// Decode rows of the given format
pub fn read_rows(format: TableFormat, bytes: &[u8]) -> IngestResult<Vec<RawRow>> {
    match format {
        TableFormat::Csv => read_csv_rows(bytes),
        TableFormat::Json => read_json_rows(bytes),
        TableFormat::Xlsx => read_workbook_rows(bytes),
    }
}

/// Decode and normalize in one step
pub fn load_records(format: TableFormat, bytes: &[u8]) -> IngestResult<Vec<InventoryRecord>> {
    let rows = read_rows(format, bytes)?;
    Ok(normalize_rows(&rows))
}

/// Read a file from disk; the format comes from the extension unless given
pub fn read_file_rows(path: &Path, format: Option<TableFormat>) -> IngestResult<Vec<RawRow>> {
    let format = match format.or_else(|| TableFormat::from_path(path)) {
        Some(format) => format,
        None => {
            return Err(IngestError::not_a_table(format!(
                "cannot tell the table format of '{}'",
                path.display()
            )))
        }
    };
    let bytes = std::fs::read(path)?;
    read_rows(format, &bytes)
}

fn log_known_columns<'a>(headers: impl Iterator<Item = &'a str>) {
    let known = headers
        .filter(|header| columns::ALL.contains(&header.trim()))
        .count();
    if known == 0 {
        tracing::warn!("No recognised inventory columns in table header");
    } else {
        tracing::debug!(known, expected = columns::ALL.len(), "Recognised inventory columns");
    }
}
