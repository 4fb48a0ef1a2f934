//! Record normalizer tests
//!
//! Tests for row normalization including:
//! - Missing and malformed fields default to zero or empty text
//! - No row is ever dropped
//! - Both accepted JSON table shapes and Excel workbooks

mod common;

use common::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use shared::ingest::{load_records, read_json_rows, read_workbook_rows};
use shared::normalize::{columns, normalize_row, normalize_rows_with_report, NormalizeReport};
use shared::{normalize_rows, AbcClass, RawRow, RawValue, TableFormat};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_full_row() {
        let row = RawRow::new()
            .with(columns::DATE, RawValue::Text("2024-01-05 00:00:00".into()))
            .with(columns::ITEM_ID, RawValue::Number(Decimal::from(1001)))
            .with(columns::ITEM_NAME, RawValue::Text("Hex Bolt".into()))
            .with(columns::CATEGORY, RawValue::Text("Fasteners".into()))
            .with(columns::ABC_CLASS, RawValue::Text("a".into()))
            .with(columns::OPENING_STOCK, RawValue::Number(Decimal::from(100)))
            .with(columns::CLOSING_STOCK, RawValue::Text(" 80 ".into()))
            .with(columns::CONSUMPTION, RawValue::Number(Decimal::from(30)))
            .with(columns::INCOMING, RawValue::Number(Decimal::from(10)))
            .with(columns::MSL, RawValue::Number(Decimal::from(50)))
            .with(columns::UNIT_PRICE, RawValue::Text("2.75".into()))
            .with(columns::UNITS, RawValue::Text("pcs".into()))
            .with(columns::INVENTORY_TURNOVER_RATIO, RawValue::Number(dec("0.33")));

        let mut report = NormalizeReport::default();
        let record = normalize_row(&row, &mut report);

        assert_eq!(record.item_id, "1001");
        assert_eq!(record.abc_class, AbcClass::A);
        assert_eq!(record.date, Some(date("2024-01-05")));
        assert_eq!(record.closing_stock, dec("80"));
        assert_eq!(record.unit_price, dec("2.75"));
        assert_eq!(report.rows, 1);
        assert_eq!(report.defaulted, 0);
        assert_eq!(report.coerced, 0);
    }

    #[test]
    fn test_empty_row_defaults() {
        let mut report = NormalizeReport::default();
        let record = normalize_row(&RawRow::new(), &mut report);

        assert_eq!(record.item_id, "");
        assert_eq!(record.item_name, "");
        assert_eq!(record.abc_class, AbcClass::Unclassified);
        assert_eq!(record.date, None);
        assert_eq!(record.opening_stock, Decimal::ZERO);
        assert_eq!(record.inventory_turnover_ratio, Decimal::ZERO);
        assert_eq!(report.defaulted, columns::ALL.len());
    }

    #[test]
    fn test_malformed_values_are_coerced() {
        let row = RawRow::new()
            .with(columns::MSL, RawValue::Text("n/a".into()))
            .with(columns::CONSUMPTION, RawValue::Bool(true))
            .with(columns::DATE, RawValue::Text("yesterday".into()));

        let (records, report) = normalize_rows_with_report([&row]);
        assert_eq!(records[0].msl, Decimal::ZERO);
        assert_eq!(records[0].consumption, Decimal::ZERO);
        assert_eq!(records[0].date, None);
        assert_eq!(report.coerced, 3);
    }

    #[test]
    fn test_json_rows_from_dataset_export() {
        let payload = json!({
            "Inventory_Data": [
                {
                    "Date": "2024-01-01 00:00:00",
                    "Item ID": "I1",
                    "Opening Stock": 100,
                    "Closing Stock": 80.5,
                    "Extra Column": "ignored"
                },
                { "Item ID": "I2", "Closing Stock": null }
            ]
        });
        let rows = read_json_rows(payload.to_string().as_bytes()).unwrap();
        let records = normalize_rows(&rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].closing_stock, dec("80.5"));
        assert_eq!(records[1].closing_stock, Decimal::ZERO);
    }

    #[test]
    fn test_csv_with_padded_headers() {
        let csv_data = " Item ID , MSL \nI1,25\n";
        let records = load_records(TableFormat::Csv, csv_data.as_bytes()).unwrap();
        assert_eq!(records[0].item_id, "I1");
        assert_eq!(records[0].msl, dec("25"));
    }

    #[test]
    fn test_record_json_shape() {
        let records = load_records(
            TableFormat::Csv,
            b"Date,Item ID,Unit Price\n2024-01-01 00:00:00,I1,2.5\n",
        )
        .unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["itemId"], "I1");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["unitPrice"], 2.5);
        assert_eq!(json["abcClass"], "");
    }

    #[test]
    fn test_excel_first_sheet() {
        let bytes = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/inventory.xlsx"
        ))
        .unwrap();

        // The blank spreadsheet row between the two bolt rows is skipped
        let rows = read_workbook_rows(&bytes).unwrap();
        assert_eq!(rows.len(), 3);

        let records = load_records(TableFormat::Xlsx, &bytes).unwrap();
        assert_eq!(records[0].item_id, "I1");
        assert_eq!(records[0].date, Some(date("2024-01-01")));
        assert_eq!(records[0].abc_class, AbcClass::A);
        assert_eq!(records[0].unit_price, dec("2.5"));
        assert_eq!(records[1].closing_stock, dec("60"));
        assert_eq!(records[2].item_id, "1001");
        assert_eq!(records[2].closing_stock, Decimal::ZERO);
        assert_eq!(records[2].inventory_turnover_ratio, Decimal::ZERO);
        assert_eq!(records[2].units, "ltr");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn cell_strategy() -> impl Strategy<Value = RawValue> {
        prop_oneof![
            Just(RawValue::Empty),
            "[a-zA-Z0-9 ./-]{0,12}".prop_map(RawValue::Text),
            (-100000i64..100000i64).prop_map(|n| RawValue::Number(Decimal::new(n, 2))),
            any::<bool>().prop_map(RawValue::Bool),
        ]
    }

    fn row_strategy() -> impl Strategy<Value = RawRow> {
        prop::collection::vec(
            (prop::sample::select(columns::ALL.to_vec()), cell_strategy()),
            0..14,
        )
        .prop_map(|cells| {
            cells
                .into_iter()
                .fold(RawRow::new(), |row, (column, value)| row.with(column, value))
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every row yields exactly one record
        #[test]
        fn prop_no_row_dropped(rows in prop::collection::vec(row_strategy(), 0..30)) {
            let (records, report) = normalize_rows_with_report(&rows);
            prop_assert_eq!(records.len(), rows.len());
            prop_assert_eq!(report.rows, rows.len());
        }

        /// Numeric cells survive unchanged
        #[test]
        fn prop_numbers_pass_through(n in -100000i64..100000i64) {
            let value = Decimal::new(n, 2);
            let row = RawRow::new().with(columns::CLOSING_STOCK, RawValue::Number(value));
            let records = normalize_rows([&row]);
            prop_assert_eq!(records[0].closing_stock, value);
        }
    }
}
