//! Turnover classifier and sorter
//!
//! Builds one [`TurnoverRow`] per item from the filtered records, classifies
//! it with [`AggregatePeriodClassification`], and ranks the rows under the
//! active [`TurnoverSort`].

use std::cmp::Ordering;
use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{
    AggregatePeriodClassification, InventoryRecord, ItemTurnoverStatus, PerRecordClassification,
    TurnoverRow, TurnoverSort, TurnoverSortKey, TurnoverStatus, TurnoverSummary, TurnoverTable,
};
use crate::types::{guarded_ratio, mean, round_half_up, saturating_sum, SortDirection};

/// Decimal places kept on reported ratios
pub const RATIO_DP: u32 = 4;

struct ItemAccumulator<'a> {
    /// Latest record seen; descriptive fields are taken from it
    latest: &'a InventoryRecord,
    total_consumption: Decimal,
    total_opening: Decimal,
    total_closing: Decimal,
    total_ratio: Decimal,
    count: usize,
}

impl<'a> ItemAccumulator<'a> {
    fn new(record: &'a InventoryRecord) -> Self {
        Self {
            latest: record,
            total_consumption: Decimal::ZERO,
            total_opening: Decimal::ZERO,
            total_closing: Decimal::ZERO,
            total_ratio: Decimal::ZERO,
            count: 0,
        }
    }

    fn add(&mut self, record: &'a InventoryRecord) {
        self.latest = record;
        self.total_consumption = self.total_consumption.saturating_add(record.consumption);
        self.total_opening = self.total_opening.saturating_add(record.opening_stock);
        self.total_closing = self.total_closing.saturating_add(record.closing_stock);
        self.total_ratio = self.total_ratio.saturating_add(record.inventory_turnover_ratio);
        self.count += 1;
    }

    fn finish(self) -> TurnoverRow {
        let item = self.latest;
        let avg_inventory = guarded_ratio(
            self.total_opening.saturating_add(self.total_closing),
            Decimal::from(2 * self.count),
        );
        let itr = guarded_ratio(self.total_consumption, avg_inventory);
        let avg_itr_from_data = mean(self.total_ratio, self.count);

        TurnoverRow {
            rank: 0,
            item_id: item.item_id.clone(),
            item_name: item.item_name.clone(),
            category: item.category.clone(),
            abc_class: item.abc_class,
            total_consumption: self.total_consumption,
            avg_inventory: round_half_up(avg_inventory, 0),
            itr: round_half_up(itr, RATIO_DP),
            status: AggregatePeriodClassification::classify(itr),
            unit_price: item.unit_price,
            inventory_value: round_half_up(avg_inventory.saturating_mul(item.unit_price), 0),
            consumption_value: round_half_up(
                self.total_consumption.saturating_mul(item.unit_price),
                0,
            ),
            units: item.units.clone(),
            msl: item.msl,
            avg_itr_from_data: round_half_up(avg_itr_from_data, RATIO_DP),
        }
    }
}

/// One row per distinct item id, in first-seen order, unranked
pub fn turnover_rows<'a, I>(records: I) -> Vec<TurnoverRow>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut items: Vec<ItemAccumulator<'a>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.item_id.as_str()).or_insert_with(|| {
            items.push(ItemAccumulator::new(record));
            items.len() - 1
        });
        items[slot].add(record);
    }

    items.into_iter().map(ItemAccumulator::finish).collect()
}

/// Case-insensitive order first; on a tie lowercase sorts before uppercase
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn compare_by(key: TurnoverSortKey, a: &TurnoverRow, b: &TurnoverRow) -> Ordering {
    match key {
        TurnoverSortKey::ItemId => locale_cmp(&a.item_id, &b.item_id),
        TurnoverSortKey::ItemName => locale_cmp(&a.item_name, &b.item_name),
        TurnoverSortKey::Category => locale_cmp(&a.category, &b.category),
        TurnoverSortKey::AbcClass => locale_cmp(a.abc_class.as_str(), b.abc_class.as_str()),
        TurnoverSortKey::Status => locale_cmp(a.status.as_str(), b.status.as_str()),
        TurnoverSortKey::Units => locale_cmp(&a.units, &b.units),
        TurnoverSortKey::TotalConsumption => a.total_consumption.cmp(&b.total_consumption),
        TurnoverSortKey::AvgInventory => a.avg_inventory.cmp(&b.avg_inventory),
        TurnoverSortKey::Itr => a.itr.cmp(&b.itr),
        TurnoverSortKey::UnitPrice => a.unit_price.cmp(&b.unit_price),
        TurnoverSortKey::InventoryValue => a.inventory_value.cmp(&b.inventory_value),
        TurnoverSortKey::ConsumptionValue => a.consumption_value.cmp(&b.consumption_value),
        TurnoverSortKey::Msl => a.msl.cmp(&b.msl),
        TurnoverSortKey::AvgItrFromData => a.avg_itr_from_data.cmp(&b.avg_itr_from_data),
    }
}

/// Stable sort; equal keys keep their incoming order. Ranks are reassigned.
pub fn sort_rows(rows: &mut [TurnoverRow], sort: TurnoverSort) {
    rows.sort_by(|a, b| match sort.direction {
        SortDirection::Ascending => compare_by(sort.key, a, b),
        SortDirection::Descending => compare_by(sort.key, b, a),
    });
    for (position, row) in rows.iter_mut().enumerate() {
        row.rank = position + 1;
    }
}

/// Header metrics over every row
pub fn turnover_summary(rows: &[TurnoverRow]) -> TurnoverSummary {
    let total_itr = saturating_sum(rows.iter().map(|row| row.itr));
    let count_status =
        |status: TurnoverStatus| rows.iter().filter(|row| row.status == status).count() as u64;

    TurnoverSummary {
        average_itr: round_half_up(mean(total_itr, rows.len()), RATIO_DP),
        high_turnover_items: count_status(TurnoverStatus::High),
        low_turnover_items: count_status(TurnoverStatus::Low),
    }
}

/// Ranked table: the first `top_n` rows under `sort` and the full count
pub fn turnover_table<'a, I>(records: I, sort: TurnoverSort, top_n: usize) -> TurnoverTable
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut rows = turnover_rows(records);
    let summary = turnover_summary(&rows);
    sort_rows(&mut rows, sort);

    let total_items = rows.len();
    rows.truncate(top_n);

    TurnoverTable {
        rows,
        total_items,
        sort,
        summary,
    }
}

// ============================================================================
// Single-item turnover
// ============================================================================

/// ITR of one item over the given records: total consumption divided by the
/// mean of each record's `(opening + closing) / 2`. Zero for unknown items.
pub fn item_itr(records: &[InventoryRecord], item_id: &str) -> Decimal {
    let mut total_consumption = Decimal::ZERO;
    let mut total_midpoint = Decimal::ZERO;
    let mut count = 0usize;

    for record in records.iter().filter(|record| record.item_id == item_id) {
        total_consumption = total_consumption.saturating_add(record.consumption);
        let midpoint = record.opening_stock.saturating_add(record.closing_stock) / Decimal::TWO;
        total_midpoint = total_midpoint.saturating_add(midpoint);
        count += 1;
    }

    let average_inventory = mean(total_midpoint, count);
    guarded_ratio(total_consumption, average_inventory)
}

/// Item ITR (4 decimal places) and its status under [`PerRecordClassification`]
pub fn classify_item(records: &[InventoryRecord], item_id: &str) -> (Decimal, ItemTurnoverStatus) {
    let itr = item_itr(records, item_id);
    (
        round_half_up(itr, RATIO_DP),
        PerRecordClassification::classify(itr),
    )
}
