//! Dashboard filter state

use serde::{Deserialize, Serialize};

use super::{AbcClass, InventoryRecord, SummaryStats};
use crate::types::{parse_calendar_date, DateBounds, Selection};

/// User-selected narrowing of the record set; every active constraint must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Case-insensitive substring of the item name; empty means no constraint
    pub item_name: String,
    pub abc_class: Selection<AbcClass>,
    pub category: Selection<String>,
    pub date_range: DateBounds,
}

impl FilterState {
    /// The empty state; filtering with it is the identity
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Default state for a freshly loaded dataset: no constraints apart from
    /// date bounds spanning the data. Those bounds let undated records
    /// through, so loading never hides a row.
    pub fn seeded(stats: &SummaryStats) -> Self {
        Self {
            date_range: DateBounds::new(
                parse_calendar_date(&stats.date_range.start),
                parse_calendar_date(&stats.date_range.end),
            )
            .with_undated(true),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_name.is_empty()
            && self.abc_class.is_all()
            && self.category.is_all()
            && self.date_range.is_unbounded()
    }

    /// Whether `record` satisfies every active constraint
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        self.matches_item_name(&record.item_name)
            && self.abc_class.matches(&record.abc_class)
            && self.category.matches(&record.category)
            && self.date_range.contains(record.date)
    }

    fn matches_item_name(&self, item_name: &str) -> bool {
        if self.item_name.is_empty() {
            return true;
        }
        item_name
            .to_lowercase()
            .contains(&self.item_name.to_lowercase())
    }
}
