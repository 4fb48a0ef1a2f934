//! Canonical inventory record

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One item's inventory movement on one day. The default is the record a
/// row with no usable fields normalizes to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub item_id: String,
    pub item_name: String,
    pub category: String,
    pub abc_class: AbcClass,
    /// `None` when the source carried no readable calendar date
    pub date: Option<NaiveDate>,
    pub opening_stock: Decimal,
    pub closing_stock: Decimal,
    pub consumption: Decimal,
    pub incoming: Decimal,
    /// Minimum stock level
    pub msl: Decimal,
    pub unit_price: Decimal,
    pub units: String,
    /// Turnover ratio as supplied by the source data
    pub inventory_turnover_ratio: Decimal,
}

impl InventoryRecord {
    /// Record-level stock badge
    pub fn stock_status(&self) -> StockStatus {
        classify_stock(self.closing_stock, self.msl)
    }
}

/// ABC value tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
    /// Missing or unrecognised class in the source row
    #[default]
    #[serde(rename = "")]
    Unclassified,
}

impl AbcClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
            AbcClass::Unclassified => "",
        }
    }

    /// Lenient parse used by the normalizer: anything unknown is `Unclassified`
    pub fn from_loose(s: &str) -> Self {
        s.parse().unwrap_or(AbcClass::Unclassified)
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbcClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(AbcClass::A),
            "B" => Ok(AbcClass::B),
            "C" => Ok(AbcClass::C),
            other => Err(format!("unknown ABC class '{}'", other)),
        }
    }
}

/// Stock position of a single record against its MSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    Low,
    Normal,
    High,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockStatus::Low => write!(f, "Low"),
            StockStatus::Normal => write!(f, "Normal"),
            StockStatus::High => write!(f, "High"),
        }
    }
}

/// At or below MSL is low; more than twice MSL is high
pub fn classify_stock(closing_stock: Decimal, msl: Decimal) -> StockStatus {
    if closing_stock <= msl {
        StockStatus::Low
    } else if closing_stock > msl.saturating_mul(Decimal::TWO) {
        StockStatus::High
    } else {
        StockStatus::Normal
    }
}
