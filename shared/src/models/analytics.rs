//! Chart-ready series produced by the aggregation engine

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Granularity;

/// One point of a stock or consumption trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly ones
    pub key: String,
    /// Axis label: `Jan 05` or `Jan 2024`
    pub label: String,
    /// First calendar day covered by the bucket
    pub start_date: NaiveDate,
    pub granularity: Granularity,
    pub count: u64,
    pub total_consumption: Decimal,
    pub total_incoming: Decimal,
    pub total_opening_stock: Decimal,
    pub total_closing_stock: Decimal,
    pub total_msl: Decimal,
    /// Distinct categories touched in the bucket
    pub categories: u64,
    pub avg_consumption: Decimal,
    pub net_movement: Decimal,
    pub avg_closing_stock: Decimal,
    pub avg_msl: Decimal,
    pub avg_opening_stock: Decimal,
    /// Records with closing stock under MSL
    #[serde(rename = "belowMSL")]
    pub below_msl: u64,
    /// Records with closing stock over 150% of MSL
    #[serde(rename = "aboveMSL")]
    pub above_msl: u64,
    pub within_range: u64,
}

/// Slice of the category distribution chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub total_closing_stock: Decimal,
    pub item_count: u64,
}

/// Threshold counts summed over a stock trend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTrendTotals {
    #[serde(rename = "belowMSL")]
    pub below_msl: u64,
    pub within_range: u64,
    #[serde(rename = "aboveMSL")]
    pub above_msl: u64,
}

/// Header metrics for the consumption trend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSummary {
    pub total_consumption: Decimal,
    /// Rounded mean consumption per bucket
    pub avg_per_bucket: Decimal,
    pub buckets_tracked: u64,
}
