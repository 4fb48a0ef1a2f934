//! Record normalizer
//!
//! Turns loosely-typed rows (decoded CSV cells or JSON values) into canonical
//! [`InventoryRecord`]s. Best-effort: a missing or malformed field becomes
//! `0` or `""`, and no row is ever dropped.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::models::{AbcClass, InventoryRecord};
use crate::types::parse_date_only;

/// Fixed column names of the inventory export
pub mod columns {
    pub const DATE: &str = "Date";
    pub const ITEM_ID: &str = "Item ID";
    pub const ITEM_NAME: &str = "Item Name";
    pub const CATEGORY: &str = "Category";
    pub const ABC_CLASS: &str = "ABC Class";
    pub const OPENING_STOCK: &str = "Opening Stock";
    pub const CLOSING_STOCK: &str = "Closing Stock";
    pub const CONSUMPTION: &str = "Consumption";
    pub const INCOMING: &str = "Incoming";
    pub const MSL: &str = "MSL";
    pub const UNIT_PRICE: &str = "Unit Price";
    pub const UNITS: &str = "Units";
    pub const INVENTORY_TURNOVER_RATIO: &str = "Inventory Turnover ratio";

    pub const ALL: [&str; 13] = [
        DATE,
        ITEM_ID,
        ITEM_NAME,
        CATEGORY,
        ABC_CLASS,
        OPENING_STOCK,
        CLOSING_STOCK,
        CONSUMPTION,
        INCOMING,
        MSL,
        UNIT_PRICE,
        UNITS,
        INVENTORY_TURNOVER_RATIO,
    ];
}

// ============================================================================
// Raw Rows
// ============================================================================

/// A single cell as it arrived from the source
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(Decimal),
    Bool(bool),
}

impl RawValue {
    /// Decode a JSON cell. Nested arrays and objects carry nothing usable.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => RawValue::Empty,
            Value::Bool(b) => RawValue::Bool(*b),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Number(n) => {
                let decimal = if let Some(i) = n.as_i64() {
                    Some(Decimal::from(i))
                } else if let Some(u) = n.as_u64() {
                    Some(Decimal::from(u))
                } else {
                    n.as_f64().and_then(|f| Decimal::try_from(f).ok())
                };
                match decimal {
                    Some(d) => RawValue::Number(d),
                    None => RawValue::Text(n.to_string()),
                }
            }
        }
    }

    /// Decode a CSV cell; blank cells are empty
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(cell.to_string())
        }
    }

    /// Numeric reading of the cell, `None` when it is not a number
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RawValue::Number(d) => Some(*d),
            RawValue::Text(s) => parse_decimal(s),
            RawValue::Empty | RawValue::Bool(_) => None,
        }
    }

    /// Text reading of the cell; numbers render without trailing zeros
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Number(d) => Some(d.normalize().to_string()),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Empty => None,
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// A decoded row keyed by (trimmed) column header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, value: RawValue) {
        self.cells.insert(column.trim().to_string(), value);
    }

    pub fn with(mut self, column: &str, value: RawValue) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    /// Build a row from a JSON object; `None` if the value is not an object
    pub fn from_json_object(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut row = RawRow::new();
        for (column, cell) in object {
            row.insert(column, RawValue::from_json(cell));
        }
        Some(row)
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Counts of fields that fell back to defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub rows: usize,
    /// Fields absent from the row
    pub defaulted: usize,
    /// Fields present but unreadable as their target type
    pub coerced: usize,
}

struct FieldReader<'a> {
    row: &'a RawRow,
    report: &'a mut NormalizeReport,
}

impl FieldReader<'_> {
    fn number(&mut self, column: &str) -> Decimal {
        let row = self.row;
        match row.get(column) {
            None | Some(RawValue::Empty) => {
                self.report.defaulted += 1;
                Decimal::ZERO
            }
            Some(value) => value.as_decimal().unwrap_or_else(|| {
                self.report.coerced += 1;
                Decimal::ZERO
            }),
        }
    }

    fn text(&mut self, column: &str) -> String {
        match self.row.get(column).and_then(RawValue::as_text) {
            Some(text) => text,
            None => {
                self.report.defaulted += 1;
                String::new()
            }
        }
    }

    fn date(&mut self, column: &str) -> Option<NaiveDate> {
        let text = self.text(column);
        if text.is_empty() {
            return None;
        }
        let parsed = date_portion(&text);
        if parsed.is_none() {
            self.report.coerced += 1;
        }
        parsed
    }
}

/// Date part of a `"YYYY-MM-DD hh:mm:ss"` value; the time is never parsed.
/// Slash layouts such as `MM/DD/YYYY` are read too.
pub fn date_portion(value: &str) -> Option<NaiveDate> {
    let date_part = value.split(' ').next()?;
    parse_date_only(date_part)
}

/// Normalize one row
pub fn normalize_row(row: &RawRow, report: &mut NormalizeReport) -> InventoryRecord {
    report.rows += 1;
    let mut field = FieldReader { row, report };

    InventoryRecord {
        item_id: field.text(columns::ITEM_ID),
        item_name: field.text(columns::ITEM_NAME),
        category: field.text(columns::CATEGORY),
        abc_class: AbcClass::from_loose(&field.text(columns::ABC_CLASS)),
        date: field.date(columns::DATE),
        opening_stock: field.number(columns::OPENING_STOCK),
        closing_stock: field.number(columns::CLOSING_STOCK),
        consumption: field.number(columns::CONSUMPTION),
        incoming: field.number(columns::INCOMING),
        msl: field.number(columns::MSL),
        unit_price: field.number(columns::UNIT_PRICE),
        units: field.text(columns::UNITS),
        inventory_turnover_ratio: field.number(columns::INVENTORY_TURNOVER_RATIO),
    }
}

/// Normalize a batch of rows, returning the coercion counts alongside
pub fn normalize_rows_with_report<'a, I>(rows: I) -> (Vec<InventoryRecord>, NormalizeReport)
where
    I: IntoIterator<Item = &'a RawRow>,
{
    let mut report = NormalizeReport::default();
    let records: Vec<InventoryRecord> = rows
        .into_iter()
        .map(|row| normalize_row(row, &mut report))
        .collect();

    if report.defaulted > 0 || report.coerced > 0 {
        tracing::debug!(
            rows = report.rows,
            defaulted = report.defaulted,
            coerced = report.coerced,
            "Normalized rows with default field values"
        );
    }

    (records, report)
}

/// Normalize a batch of rows
pub fn normalize_rows<'a, I>(rows: I) -> Vec<InventoryRecord>
where
    I: IntoIterator<Item = &'a RawRow>,
{
    normalize_rows_with_report(rows).0
}
