//! Inventory turnover ratio (ITR) models and classification policies

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AbcClass;
use crate::types::SortDirection;

/// Rows shown in the turnover table unless configured otherwise
pub const DEFAULT_TOP_N: usize = 20;

/// Per-item turnover figures over the filtered window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverRow {
    /// 1-based position under the current sort
    pub rank: usize,
    pub item_id: String,
    pub item_name: String,
    pub category: String,
    pub abc_class: AbcClass,
    pub total_consumption: Decimal,
    /// Rounded to a whole unit
    pub avg_inventory: Decimal,
    /// Calculated ITR, 4 decimal places
    pub itr: Decimal,
    pub status: TurnoverStatus,
    pub unit_price: Decimal,
    pub inventory_value: Decimal,
    pub consumption_value: Decimal,
    pub units: String,
    pub msl: Decimal,
    /// Mean of the source-supplied ratios, 4 decimal places
    #[serde(rename = "avgITRFromData")]
    pub avg_itr_from_data: Decimal,
}

/// Header metrics for the turnover table, over all rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverSummary {
    #[serde(rename = "averageITR")]
    pub average_itr: Decimal,
    pub high_turnover_items: u64,
    pub low_turnover_items: u64,
}

/// The ranked table: the displayed window plus the full row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverTable {
    pub rows: Vec<TurnoverRow>,
    pub total_items: usize,
    pub sort: TurnoverSort,
    pub summary: TurnoverSummary,
}

// ============================================================================
// Classification Policies
// ============================================================================

/// Turnover status used by the filtered-period table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnoverStatus {
    High,
    Medium,
    Low,
}

impl TurnoverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnoverStatus::High => "High",
            TurnoverStatus::Medium => "Medium",
            TurnoverStatus::Low => "Low",
        }
    }
}

impl fmt::Display for TurnoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turnover status for a single item over its whole history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemTurnoverStatus {
    High,
    Normal,
    Low,
}

impl fmt::Display for ItemTurnoverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemTurnoverStatus::High => write!(f, "High"),
            ItemTurnoverStatus::Normal => write!(f, "Normal"),
            ItemTurnoverStatus::Low => write!(f, "Low"),
        }
    }
}

/// Thresholds applied to the per-item ITR of the filtered period:
/// above 0.2 is high, below 0.05 is low
pub struct AggregatePeriodClassification;

impl AggregatePeriodClassification {
    pub fn high_above() -> Decimal {
        Decimal::new(2, 1)
    }

    pub fn low_below() -> Decimal {
        Decimal::new(5, 2)
    }

    pub fn classify(itr: Decimal) -> TurnoverStatus {
        if itr > Self::high_above() {
            TurnoverStatus::High
        } else if itr < Self::low_below() {
            TurnoverStatus::Low
        } else {
            TurnoverStatus::Medium
        }
    }
}

/// Thresholds applied to a single item's ITR over the full dataset:
/// below 1 is low, above 3 is high.
///
/// Kept apart from [`AggregatePeriodClassification`]; the two scales differ
/// by an order of magnitude and answer different questions.
pub struct PerRecordClassification;

impl PerRecordClassification {
    pub fn low_below() -> Decimal {
        Decimal::ONE
    }

    pub fn high_above() -> Decimal {
        Decimal::from(3)
    }

    pub fn classify(itr: Decimal) -> ItemTurnoverStatus {
        if itr < Self::low_below() {
            ItemTurnoverStatus::Low
        } else if itr > Self::high_above() {
            ItemTurnoverStatus::High
        } else {
            ItemTurnoverStatus::Normal
        }
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Any column of [`TurnoverRow`] the table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnoverSortKey {
    ItemId,
    ItemName,
    Category,
    AbcClass,
    TotalConsumption,
    AvgInventory,
    Itr,
    Status,
    UnitPrice,
    InventoryValue,
    ConsumptionValue,
    Units,
    Msl,
    #[serde(rename = "avgITRFromData")]
    AvgItrFromData,
}

impl TurnoverSortKey {
    pub const ALL: [TurnoverSortKey; 14] = [
        TurnoverSortKey::ItemId,
        TurnoverSortKey::ItemName,
        TurnoverSortKey::Category,
        TurnoverSortKey::AbcClass,
        TurnoverSortKey::TotalConsumption,
        TurnoverSortKey::AvgInventory,
        TurnoverSortKey::Itr,
        TurnoverSortKey::Status,
        TurnoverSortKey::UnitPrice,
        TurnoverSortKey::InventoryValue,
        TurnoverSortKey::ConsumptionValue,
        TurnoverSortKey::Units,
        TurnoverSortKey::Msl,
        TurnoverSortKey::AvgItrFromData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TurnoverSortKey::ItemId => "itemId",
            TurnoverSortKey::ItemName => "itemName",
            TurnoverSortKey::Category => "category",
            TurnoverSortKey::AbcClass => "abcClass",
            TurnoverSortKey::TotalConsumption => "totalConsumption",
            TurnoverSortKey::AvgInventory => "avgInventory",
            TurnoverSortKey::Itr => "itr",
            TurnoverSortKey::Status => "status",
            TurnoverSortKey::UnitPrice => "unitPrice",
            TurnoverSortKey::InventoryValue => "inventoryValue",
            TurnoverSortKey::ConsumptionValue => "consumptionValue",
            TurnoverSortKey::Units => "units",
            TurnoverSortKey::Msl => "msl",
            TurnoverSortKey::AvgItrFromData => "avgITRFromData",
        }
    }

    /// Text columns compare as strings, the rest numerically
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            TurnoverSortKey::ItemId
                | TurnoverSortKey::ItemName
                | TurnoverSortKey::Category
                | TurnoverSortKey::AbcClass
                | TurnoverSortKey::Status
                | TurnoverSortKey::Units
        )
    }
}

impl FromStr for TurnoverSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown turnover sort key '{}'", wanted))
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnoverSort {
    pub key: TurnoverSortKey,
    pub direction: SortDirection,
}

impl Default for TurnoverSort {
    fn default() -> Self {
        Self {
            key: TurnoverSortKey::Itr,
            direction: SortDirection::Descending,
        }
    }
}

impl TurnoverSort {
    pub fn new(key: TurnoverSortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: the active column flips direction, a new column starts descending
    pub fn toggle(self, key: TurnoverSortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.toggled())
        } else {
            Self::new(key, SortDirection::Descending)
        }
    }
}
