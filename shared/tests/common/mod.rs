//! Builders and strategies shared by the integration tests

#![allow(dead_code)]

use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{AbcClass, InventoryRecord};

// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// A record with the stock movement fields set and neutral defaults elsewhere
pub fn record(
    item_id: &str,
    category: &str,
    day: &str,
    opening: i64,
    closing: i64,
    consumption: i64,
) -> InventoryRecord {
    InventoryRecord {
        item_id: item_id.to_string(),
        item_name: format!("Item {}", item_id),
        category: category.to_string(),
        abc_class: AbcClass::A,
        date: Some(date(day)),
        opening_stock: Decimal::from(opening),
        closing_stock: Decimal::from(closing),
        consumption: Decimal::from(consumption),
        incoming: Decimal::ZERO,
        msl: Decimal::from(50),
        unit_price: Decimal::ONE,
        units: "pcs".to_string(),
        inventory_turnover_ratio: Decimal::ZERO,
    }
}

// ============================================================================
// Strategies
// ============================================================================

pub fn abc_strategy() -> impl Strategy<Value = AbcClass> {
    prop_oneof![
        Just(AbcClass::A),
        Just(AbcClass::B),
        Just(AbcClass::C),
        Just(AbcClass::Unclassified),
    ]
}

/// Whole quantities 0 to 500
pub fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=500i64).prop_map(Decimal::from)
}

/// Dates from November 2023 to March 2024, occasionally missing
pub fn date_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop_oneof![
        9 => (0i64..150).prop_map(|offset| Some(date("2023-11-01") + Duration::days(offset))),
        1 => Just(None),
    ]
}

pub fn record_strategy() -> impl Strategy<Value = InventoryRecord> {
    (
        (1u8..=6).prop_map(|n| format!("I{}", n)),
        prop::sample::select(vec!["Hex Bolt", "hex nut", "Gear Oil", "Washer", "Drill Bit"]),
        prop::sample::select(vec!["Fasteners", "Lubricants", "Tools"]),
        abc_strategy(),
        date_strategy(),
        (quantity_strategy(), quantity_strategy(), quantity_strategy(), quantity_strategy()),
        quantity_strategy(),
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 2)),
    )
        .prop_map(
            |(item_id, name, category, abc_class, date, (opening, closing, consumption, incoming), msl, unit_price)| {
                InventoryRecord {
                    item_id,
                    item_name: name.to_string(),
                    category: category.to_string(),
                    abc_class,
                    date,
                    opening_stock: opening,
                    closing_stock: closing,
                    consumption,
                    incoming,
                    msl,
                    unit_price,
                    units: "pcs".to_string(),
                    inventory_turnover_ratio: Decimal::new(25, 2),
                }
            },
        )
}

pub fn records_strategy() -> impl Strategy<Value = Vec<InventoryRecord>> {
    prop::collection::vec(record_strategy(), 0..40)
}
