//! Aggregation engine
//!
//! Reduces filtered records into chart series: time buckets (daily or
//! monthly) and the category distribution.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    CategoryShare, ConsumptionSummary, InventoryRecord, StockTrendTotals, TimeBucket,
};
use crate::types::{mean, round_half_up, saturating_sum, Granularity};

/// Closing stock above this multiple of MSL counts as overstocked
pub fn overstock_factor() -> Decimal {
    Decimal::new(15, 1)
}

/// Where a record's closing stock sits relative to its MSL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MslBand {
    Below,
    Within,
    Above,
}

/// Below when under MSL, above when over 1.5 x MSL, otherwise within
pub fn msl_band(closing_stock: Decimal, msl: Decimal) -> MslBand {
    if closing_stock < msl {
        MslBand::Below
    } else if closing_stock > msl.saturating_mul(overstock_factor()) {
        MslBand::Above
    } else {
        MslBand::Within
    }
}

/// First calendar day of the bucket containing `date`
pub fn bucket_start(date: NaiveDate, granularity: Granularity) -> NaiveDate {
    match granularity {
        Granularity::Daily => date,
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    }
}

fn bucket_key(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => start.format("%Y-%m-%d").to_string(),
        Granularity::Monthly => start.format("%Y-%m").to_string(),
    }
}

fn bucket_label(start: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Daily => start.format("%b %d").to_string(),
        Granularity::Monthly => start.format("%b %Y").to_string(),
    }
}

#[derive(Default)]
struct BucketAccumulator<'a> {
    count: u64,
    consumption: Decimal,
    incoming: Decimal,
    opening: Decimal,
    closing: Decimal,
    msl: Decimal,
    categories: HashSet<&'a str>,
    below_msl: u64,
    above_msl: u64,
}

impl<'a> BucketAccumulator<'a> {
    fn add(&mut self, record: &'a InventoryRecord) {
        self.count += 1;
        self.consumption = self.consumption.saturating_add(record.consumption);
        self.incoming = self.incoming.saturating_add(record.incoming);
        self.opening = self.opening.saturating_add(record.opening_stock);
        self.closing = self.closing.saturating_add(record.closing_stock);
        self.msl = self.msl.saturating_add(record.msl);
        self.categories.insert(record.category.as_str());

        match msl_band(record.closing_stock, record.msl) {
            MslBand::Below => self.below_msl += 1,
            MslBand::Above => self.above_msl += 1,
            MslBand::Within => {}
        }
    }

    fn finish(self, start: NaiveDate, granularity: Granularity) -> TimeBucket {
        let count = self.count as usize;
        TimeBucket {
            key: bucket_key(start, granularity),
            label: bucket_label(start, granularity),
            start_date: start,
            granularity,
            count: self.count,
            total_consumption: self.consumption,
            total_incoming: self.incoming,
            total_opening_stock: self.opening,
            total_closing_stock: self.closing,
            total_msl: self.msl,
            categories: self.categories.len() as u64,
            avg_consumption: round_half_up(mean(self.consumption, count), 0),
            net_movement: self.incoming.saturating_sub(self.consumption),
            avg_closing_stock: round_half_up(mean(self.closing, count), 0),
            avg_msl: round_half_up(mean(self.msl, count), 0),
            avg_opening_stock: round_half_up(mean(self.opening, count), 0),
            below_msl: self.below_msl,
            above_msl: self.above_msl,
            within_range: self.count - self.below_msl - self.above_msl,
        }
    }
}

/// Group records into day or month buckets, oldest first.
/// Undated records have no bucket and are left out.
pub fn time_buckets<'a, I>(records: I, granularity: Granularity) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut buckets: BTreeMap<NaiveDate, BucketAccumulator<'a>> = BTreeMap::new();
    let mut undated = 0usize;

    for record in records {
        let Some(date) = record.date else {
            undated += 1;
            continue;
        };
        buckets
            .entry(bucket_start(date, granularity))
            .or_default()
            .add(record);
    }

    if undated > 0 {
        tracing::debug!(undated, ?granularity, "Skipped undated records in time buckets");
    }

    buckets
        .into_iter()
        .map(|(start, acc)| acc.finish(start, granularity))
        .collect()
}

/// Daily stock-vs-MSL series
pub fn stock_trend<'a, I>(records: I) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    time_buckets(records, Granularity::Daily)
}

/// Monthly consumption series
pub fn consumption_trend<'a, I>(records: I) -> Vec<TimeBucket>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    time_buckets(records, Granularity::Monthly)
}

/// Threshold counts across every bucket of a trend
pub fn stock_trend_totals(buckets: &[TimeBucket]) -> StockTrendTotals {
    buckets
        .iter()
        .fold(StockTrendTotals::default(), |mut totals, bucket| {
            totals.below_msl += bucket.below_msl;
            totals.within_range += bucket.within_range;
            totals.above_msl += bucket.above_msl;
            totals
        })
}

/// Total, rounded mean per bucket, and bucket count of a consumption trend
pub fn consumption_summary(buckets: &[TimeBucket]) -> ConsumptionSummary {
    let total_consumption = saturating_sum(buckets.iter().map(|b| b.total_consumption));
    ConsumptionSummary {
        total_consumption,
        avg_per_bucket: round_half_up(mean(total_consumption, buckets.len()), 0),
        buckets_tracked: buckets.len() as u64,
    }
}

/// Closing stock and record count per category, in first-seen order
pub fn category_distribution<'a, I>(records: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut shares: Vec<CategoryShare> = Vec::new();

    for record in records {
        let slot = *index.entry(record.category.as_str()).or_insert_with(|| {
            shares.push(CategoryShare {
                category: record.category.clone(),
                total_closing_stock: Decimal::ZERO,
                item_count: 0,
            });
            shares.len() - 1
        });
        let share = &mut shares[slot];
        share.total_closing_stock = share.total_closing_stock.saturating_add(record.closing_stock);
        share.item_count += 1;
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msl_band_edges() {
        let msl = Decimal::from(100);
        assert_eq!(msl_band(Decimal::from(99), msl), MslBand::Below);
        assert_eq!(msl_band(Decimal::from(100), msl), MslBand::Within);
        assert_eq!(msl_band(Decimal::from(150), msl), MslBand::Within);
        assert_eq!(msl_band(Decimal::from(151), msl), MslBand::Above);
        // Zero MSL: any positive stock is over 150%
        assert_eq!(msl_band(Decimal::ONE, Decimal::ZERO), MslBand::Above);
        assert_eq!(msl_band(Decimal::ZERO, Decimal::ZERO), MslBand::Within);
    }

    #[test]
    fn test_bucket_labels() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(bucket_label(date, Granularity::Daily), "Jan 05");
        let month = bucket_start(date, Granularity::Monthly);
        assert_eq!(bucket_key(month, Granularity::Monthly), "2024-01");
        assert_eq!(bucket_label(month, Granularity::Monthly), "Jan 2024");
    }

    #[test]
    fn test_bucket_totals_saturate() {
        let record = InventoryRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 5),
            closing_stock: Decimal::MAX,
            consumption: Decimal::MAX,
            msl: Decimal::MAX,
            ..InventoryRecord::default()
        };
        let records = vec![record.clone(), record];

        let buckets = time_buckets(&records, Granularity::Daily);
        assert_eq!(buckets[0].total_consumption, Decimal::MAX);
        assert_eq!(buckets[0].within_range, 2);
        assert_eq!(consumption_summary(&buckets).total_consumption, Decimal::MAX);
        assert_eq!(category_distribution(&records)[0].total_closing_stock, Decimal::MAX);
    }

    #[test]
    fn test_consumption_summary_empty() {
        let summary = consumption_summary(&[]);
        assert_eq!(summary.total_consumption, Decimal::ZERO);
        assert_eq!(summary.avg_per_bucket, Decimal::ZERO);
        assert_eq!(summary.buckets_tracked, 0);
    }
}
