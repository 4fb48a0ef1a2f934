//! Whole-dataset descriptive statistics

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AbcClass;

/// Header metrics and default filter bounds, computed over the unfiltered data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Distinct item ids
    pub total_items: u64,
    /// Record count
    pub total_transactions: u64,
    /// Distinct categories in first-seen order
    pub categories: Vec<String>,
    /// Distinct ABC classes in first-seen order
    pub abc_classes: Vec<AbcClass>,
    pub date_range: DateSpan,
    pub price_range: ValueRange,
    pub msl_range: ValueRange,
    pub stock_range: StockRange,
    pub consumption_range: ConsumptionRange,
}

/// Earliest and latest record date as `YYYY-MM-DD`; empty when undated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRange {
    pub min_opening: Decimal,
    pub max_opening: Decimal,
    pub min_closing: Decimal,
    pub max_closing: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRange {
    pub min: Decimal,
    pub max: Decimal,
    pub total: Decimal,
}

/// Reference attributes of one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMaster {
    pub item_id: String,
    pub item_name: String,
    pub category: String,
    pub abc_class: AbcClass,
    pub unit_price: Decimal,
    pub msl: Decimal,
    pub units: String,
}
