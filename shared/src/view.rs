//! Dashboard view: one pure pass from snapshot and filter to every chart

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{
    category_distribution, consumption_summary, stock_trend_totals, time_buckets,
};
use crate::filter::evaluate_refs;
use crate::models::{
    CategoryShare, ConsumptionSummary, FilterState, InventoryRecord, StockTrendTotals,
    SummaryStats, TimeBucket, TurnoverSort, TurnoverTable, DEFAULT_TOP_N,
};
use crate::stats::summary_stats;
use crate::turnover::turnover_table;
use crate::types::Granularity;

/// Immutable canonical collection for a session, with its stats
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    version: Uuid,
    records: Vec<InventoryRecord>,
    stats: SummaryStats,
}

impl Snapshot {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        let stats = summary_stats(&records);
        Self {
            version: Uuid::new_v4(),
            records,
            stats,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Fresh per ingestion
    pub fn version(&self) -> Uuid {
        self.version
    }

    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    pub fn stats(&self) -> &SummaryStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Rendering choices that are not filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptions {
    pub stock_granularity: Granularity,
    pub consumption_granularity: Granularity,
    pub turnover_sort: TurnoverSort,
    pub top_n: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            stock_granularity: Granularity::Daily,
            consumption_granularity: Granularity::Monthly,
            turnover_sort: TurnoverSort::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Everything the dashboard renders for one filter state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub snapshot_version: Uuid,
    pub filter: FilterState,
    pub filtered_records: usize,
    pub category_distribution: Vec<CategoryShare>,
    pub stock_trend: Vec<TimeBucket>,
    pub stock_totals: StockTrendTotals,
    pub consumption_trend: Vec<TimeBucket>,
    pub consumption_summary: ConsumptionSummary,
    pub turnover: TurnoverTable,
    pub stats: SummaryStats,
}

/// Filter the snapshot and derive every surface from the result
pub fn apply_filter(
    snapshot: &Snapshot,
    filter: &FilterState,
    options: &ViewOptions,
) -> DashboardView {
    let filtered = evaluate_refs(&snapshot.records, filter);

    let stock_trend = time_buckets(filtered.iter().copied(), options.stock_granularity);
    let consumption_trend =
        time_buckets(filtered.iter().copied(), options.consumption_granularity);

    tracing::debug!(
        version = %snapshot.version,
        total = snapshot.len(),
        filtered = filtered.len(),
        "Derived dashboard view"
    );

    DashboardView {
        snapshot_version: snapshot.version,
        filter: filter.clone(),
        filtered_records: filtered.len(),
        category_distribution: category_distribution(filtered.iter().copied()),
        stock_totals: stock_trend_totals(&stock_trend),
        stock_trend,
        consumption_summary: consumption_summary(&consumption_trend),
        consumption_trend,
        turnover: turnover_table(filtered.iter().copied(), options.turnover_sort, options.top_n),
        stats: snapshot.stats.clone(),
    }
}
