//! Summary statistics over the unfiltered dataset

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    ConsumptionRange, DateSpan, InventoryRecord, ItemMaster, StockRange, SummaryStats, ValueRange,
};

#[derive(Default)]
struct MinMax {
    bounds: Option<(Decimal, Decimal)>,
}

impl MinMax {
    fn add(&mut self, value: Decimal) {
        self.bounds = Some(match self.bounds {
            None => (value, value),
            Some((min, max)) => (min.min(value), max.max(value)),
        });
    }

    fn range(&self) -> ValueRange {
        let (min, max) = self.bounds.unwrap_or_default();
        ValueRange { min, max }
    }
}

/// Descriptive stats; an empty dataset yields zeros and empty strings
pub fn summary_stats(records: &[InventoryRecord]) -> SummaryStats {
    let mut item_ids: HashSet<&str> = HashSet::new();
    let mut categories: Vec<String> = Vec::new();
    let mut seen_categories: HashSet<&str> = HashSet::new();
    let mut abc_classes = Vec::new();
    let mut dates: Option<(NaiveDate, NaiveDate)> = None;
    let mut price = MinMax::default();
    let mut msl = MinMax::default();
    let mut opening = MinMax::default();
    let mut closing = MinMax::default();
    let mut consumption = MinMax::default();
    let mut total_consumption = Decimal::ZERO;

    for record in records {
        item_ids.insert(record.item_id.as_str());
        if seen_categories.insert(record.category.as_str()) {
            categories.push(record.category.clone());
        }
        if !abc_classes.contains(&record.abc_class) {
            abc_classes.push(record.abc_class);
        }
        if let Some(date) = record.date {
            dates = Some(match dates {
                None => (date, date),
                Some((start, end)) => (start.min(date), end.max(date)),
            });
        }
        price.add(record.unit_price);
        msl.add(record.msl);
        opening.add(record.opening_stock);
        closing.add(record.closing_stock);
        consumption.add(record.consumption);
        total_consumption = total_consumption.saturating_add(record.consumption);
    }

    let date_range = dates
        .map(|(start, end)| DateSpan {
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        })
        .unwrap_or_default();
    let opening = opening.range();
    let closing = closing.range();
    let consumption_minmax = consumption.range();

    SummaryStats {
        total_items: item_ids.len() as u64,
        total_transactions: records.len() as u64,
        categories,
        abc_classes,
        date_range,
        price_range: price.range(),
        msl_range: msl.range(),
        stock_range: StockRange {
            min_opening: opening.min,
            max_opening: opening.max,
            min_closing: closing.min,
            max_closing: closing.max,
        },
        consumption_range: ConsumptionRange {
            min: consumption_minmax.min,
            max: consumption_minmax.max,
            total: total_consumption,
        },
    }
}

/// Reference attributes of each distinct item, first-seen order
pub fn item_master(records: &[InventoryRecord]) -> Vec<ItemMaster> {
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.item_id.as_str()))
        .map(|record| ItemMaster {
            item_id: record.item_id.clone(),
            item_name: record.item_name.clone(),
            category: record.category.clone(),
            abc_class: record.abc_class,
            unit_price: record.unit_price,
            msl: record.msl,
            units: record.units.clone(),
        })
        .collect()
}
