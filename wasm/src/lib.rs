//! WebAssembly module for the Inventory Analytics Dashboard
//!
//! Provides client-side computation for:
//! - Normalizing uploaded CSV/JSON tables and Excel workbooks
//! - Filtering, chart aggregation and turnover ranking
//! - A stateful dashboard session with guarded ingestion
//!
//! Every function takes and returns JSON strings; workbooks arrive as bytes.

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::aggregate;
use shared::filter::evaluate;
use shared::ingest::{load_records, read_rows, TableFormat};
use shared::stats::summary_stats;
use shared::turnover;
use shared::{
    apply_filter, FilterState, Granularity, IngestError, InventoryRecord, ItemTurnoverStatus,
    Session, SortDirection, Snapshot, TurnoverSort, TurnoverSortKey, ViewOptions, DEFAULT_TOP_N,
};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("inventory dashboard module loaded"));
}

// ============================================================================
// JSON plumbing
// ============================================================================

fn to_js(message: String) -> JsValue {
    JsValue::from(js_sys::Error::new(&message))
}

fn ingest_message(err: &IngestError) -> String {
    format!("{}: {}", err.code(), err)
}

fn parse_records(records_json: &str) -> Result<Vec<InventoryRecord>, String> {
    serde_json::from_str(records_json).map_err(|e| format!("Invalid records JSON: {}", e))
}

fn parse_filter(filter_json: &str) -> Result<FilterState, String> {
    if filter_json.trim().is_empty() {
        return Ok(FilterState::cleared());
    }
    serde_json::from_str(filter_json).map_err(|e| format!("Invalid filter JSON: {}", e))
}

fn parse_options(options_json: Option<&str>) -> Result<ViewOptions, String> {
    match options_json.map(str::trim) {
        None | Some("") => Ok(ViewOptions::default()),
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("Invalid view options JSON: {}", e))
        }
    }
}

fn parse_granularity(granularity: Option<&str>, fallback: Granularity) -> Result<Granularity, String> {
    match granularity.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(value) => value.parse(),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to encode result: {}", e))
}

// ============================================================================
// Stateless functions
// ============================================================================

fn normalize_rows_json(format: &str, table: &str) -> Result<String, String> {
    let format: TableFormat = format.parse()?;
    let records = load_records(format, table.as_bytes()).map_err(|e| ingest_message(&e))?;
    to_json(&records)
}

/// Decode a CSV or JSON table into canonical records
#[wasm_bindgen]
pub fn normalize_rows(format: &str, table: &str) -> Result<String, JsValue> {
    normalize_rows_json(format, table).map_err(to_js)
}

fn normalize_workbook_json(bytes: &[u8]) -> Result<String, String> {
    let records = load_records(TableFormat::Xlsx, bytes).map_err(|e| ingest_message(&e))?;
    to_json(&records)
}

/// Decode the first sheet of an `.xlsx`/`.xls` workbook into canonical records
#[wasm_bindgen(js_name = normalizeWorkbook)]
pub fn normalize_workbook(bytes: &[u8]) -> Result<String, JsValue> {
    normalize_workbook_json(bytes).map_err(to_js)
}

fn filter_records_json(records_json: &str, filter_json: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let filter = parse_filter(filter_json)?;
    to_json(&evaluate(&records, &filter))
}

/// Records matching every active constraint of the filter
#[wasm_bindgen]
pub fn filter_records(records_json: &str, filter_json: &str) -> Result<String, JsValue> {
    filter_records_json(records_json, filter_json).map_err(to_js)
}

fn category_distribution_json(records_json: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    to_json(&aggregate::category_distribution(&records))
}

/// Closing stock and record count per category
#[wasm_bindgen]
pub fn category_distribution(records_json: &str) -> Result<String, JsValue> {
    category_distribution_json(records_json).map_err(to_js)
}

fn trend_json(
    records_json: &str,
    granularity: Option<&str>,
    fallback: Granularity,
) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let granularity = parse_granularity(granularity, fallback)?;
    to_json(&aggregate::time_buckets(&records, granularity))
}

/// Stock-vs-MSL buckets; daily unless `granularity` says otherwise
#[wasm_bindgen]
pub fn stock_trend(records_json: &str, granularity: Option<String>) -> Result<String, JsValue> {
    trend_json(records_json, granularity.as_deref(), Granularity::Daily).map_err(to_js)
}

/// Consumption buckets; monthly unless `granularity` says otherwise
#[wasm_bindgen]
pub fn consumption_trend(records_json: &str, granularity: Option<String>) -> Result<String, JsValue> {
    trend_json(records_json, granularity.as_deref(), Granularity::Monthly).map_err(to_js)
}

fn turnover_table_json(
    records_json: &str,
    sort_key: Option<&str>,
    direction: Option<&str>,
    top_n: Option<u32>,
) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let mut sort = TurnoverSort::default();
    if let Some(key) = sort_key.filter(|k| !k.trim().is_empty()) {
        sort.key = key.parse::<TurnoverSortKey>()?;
    }
    if let Some(direction) = direction.filter(|d| !d.trim().is_empty()) {
        sort.direction = direction.parse::<SortDirection>()?;
    }
    let top_n = top_n.map_or(DEFAULT_TOP_N, |n| n as usize);
    to_json(&turnover::turnover_table(&records, sort, top_n))
}

/// Ranked turnover table
#[wasm_bindgen]
pub fn turnover_table(
    records_json: &str,
    sort_key: Option<String>,
    direction: Option<String>,
    top_n: Option<u32>,
) -> Result<String, JsValue> {
    turnover_table_json(records_json, sort_key.as_deref(), direction.as_deref(), top_n)
        .map_err(to_js)
}

fn summary_statistics_json(records_json: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    to_json(&summary_stats(&records))
}

/// Descriptive statistics over the given records
#[wasm_bindgen]
pub fn summary_statistics(records_json: &str) -> Result<String, JsValue> {
    summary_statistics_json(records_json).map_err(to_js)
}

#[derive(Serialize)]
struct ItemTurnover {
    itr: Decimal,
    status: ItemTurnoverStatus,
}

fn classify_item_turnover_json(records_json: &str, item_id: &str) -> Result<String, String> {
    let records = parse_records(records_json)?;
    let (itr, status) = turnover::classify_item(&records, item_id);
    to_json(&ItemTurnover { itr, status })
}

/// Whole-history ITR of one item with its per-item status
#[wasm_bindgen]
pub fn classify_item_turnover(records_json: &str, item_id: &str) -> Result<String, JsValue> {
    classify_item_turnover_json(records_json, item_id).map_err(to_js)
}

fn dashboard_view_json(
    records_json: &str,
    filter_json: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let snapshot = Snapshot::new(parse_records(records_json)?);
    let filter = parse_filter(filter_json)?;
    let options = parse_options(options_json)?;
    to_json(&apply_filter(&snapshot, &filter, &options))
}

/// Every dashboard surface for one filter state
#[wasm_bindgen]
pub fn dashboard_view(
    records_json: &str,
    filter_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    dashboard_view_json(records_json, filter_json, options_json.as_deref()).map_err(to_js)
}

// ============================================================================
// Session
// ============================================================================

/// Stateful dashboard: holds the loaded data and the current filter
#[wasm_bindgen]
#[derive(Default)]
pub struct DashboardSession {
    inner: Session,
}

impl DashboardSession {
    fn commit_table(&mut self, format: TableFormat, table: &[u8]) -> Result<String, String> {
        match read_rows(format, table) {
            Ok(rows) => {
                let snapshot = self
                    .inner
                    .commit_ingest(&rows)
                    .map_err(|e| ingest_message(&e))?;
                to_json(snapshot.stats())
            }
            Err(e) => {
                self.inner.abort_ingest();
                Err(ingest_message(&e))
            }
        }
    }

    fn commit_bytes(&mut self, format: &str, table: &[u8]) -> Result<String, JsValue> {
        let format: TableFormat = match format.parse() {
            Ok(format) => format,
            Err(e) => {
                self.inner.abort_ingest();
                return Err(to_js(e));
            }
        };
        self.commit_table(format, table).map_err(|e| {
            web_sys::console::warn_1(&JsValue::from_str(&e));
            to_js(e)
        })
    }

    fn ingest_table(&mut self, format: TableFormat, table: &[u8]) -> Result<String, String> {
        let snapshot = self
            .inner
            .ingest(format, table)
            .map_err(|e| ingest_message(&e))?;
        to_json(snapshot.stats())
    }

    fn view_json(&mut self, options_json: Option<&str>) -> Result<String, String> {
        let options = parse_options(options_json)?;
        to_json(self.inner.view(&options))
    }
}

#[wasm_bindgen]
impl DashboardSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DashboardSession {
        DashboardSession::default()
    }

    /// Claim the session for an upload; fails while another is in flight
    #[wasm_bindgen(js_name = beginIngest)]
    pub fn begin_ingest(&mut self) -> Result<(), JsValue> {
        self.inner
            .begin_ingest()
            .map_err(|e| to_js(ingest_message(&e)))
    }

    /// Install the decoded table; returns the new summary statistics
    #[wasm_bindgen(js_name = commitIngest)]
    pub fn commit_ingest(&mut self, format: &str, table: &str) -> Result<String, JsValue> {
        self.commit_bytes(format, table.as_bytes())
    }

    /// Like `commitIngest`, for binary uploads such as workbooks
    #[wasm_bindgen(js_name = commitIngestBytes)]
    pub fn commit_ingest_bytes(&mut self, format: &str, table: &[u8]) -> Result<String, JsValue> {
        self.commit_bytes(format, table)
    }

    /// Release the session after a failed upload; current data stays
    #[wasm_bindgen(js_name = abortIngest)]
    pub fn abort_ingest(&mut self) {
        self.inner.abort_ingest();
    }

    #[wasm_bindgen(js_name = ingestCsv)]
    pub fn ingest_csv(&mut self, table: &str) -> Result<String, JsValue> {
        self.ingest_table(TableFormat::Csv, table.as_bytes()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = ingestJson)]
    pub fn ingest_json(&mut self, table: &str) -> Result<String, JsValue> {
        self.ingest_table(TableFormat::Json, table.as_bytes()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = ingestWorkbook)]
    pub fn ingest_workbook(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        self.ingest_table(TableFormat::Xlsx, bytes).map_err(to_js)
    }

    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, filter_json: &str) -> Result<(), JsValue> {
        let filter = parse_filter(filter_json).map_err(to_js)?;
        self.inner.set_filter(filter);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearFilter)]
    pub fn clear_filter(&mut self) {
        self.inner.clear_filter();
    }

    /// Current filter as JSON
    pub fn filter(&self) -> Result<String, JsValue> {
        to_json(self.inner.filter()).map_err(to_js)
    }

    /// Dashboard view for the current data and filter
    pub fn view(&mut self, options_json: Option<String>) -> Result<String, JsValue> {
        self.view_json(options_json.as_deref()).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.inner.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SAMPLE_CSV: &str = "\
Date,Item ID,Item Name,Category,ABC Class,Opening Stock,Closing Stock,Consumption,Incoming,MSL,Unit Price,Units,Inventory Turnover ratio
2024-01-01 00:00:00,I1,Hex Bolt,Fasteners,A,100,80,30,10,50,2.5,pcs,0.33
2024-01-02 00:00:00,I1,Hex Bolt,Fasteners,A,80,60,30,10,50,2.5,pcs,0.43
2024-01-03 00:00:00,I1,Hex Bolt,Fasteners,A,60,40,30,10,50,2.5,pcs,0.6
2024-02-01 00:00:00,I2,Gear Oil,Lubricants,B,20,20,0,0,20,12,ltr,0
";

    fn sample_records_json() -> String {
        normalize_rows_json("csv", SAMPLE_CSV).unwrap()
    }

    #[test]
    fn test_normalize_rows_json() {
        let records: Value = serde_json::from_str(&sample_records_json()).unwrap();
        let records = records.as_array().unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0]["itemId"], "I1");
        assert_eq!(records[0]["date"], "2024-01-01");
        assert_eq!(records[0]["abcClass"], "A");
    }

    #[test]
    fn test_normalize_rejects_unknown_format() {
        assert!(normalize_rows_json("xml", SAMPLE_CSV).is_err());
    }

    #[test]
    fn test_workbook_json() {
        let bytes = std::fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../shared/tests/fixtures/inventory.xlsx"
        ))
        .unwrap();
        let records: Value = serde_json::from_str(&normalize_workbook_json(&bytes).unwrap()).unwrap();
        assert_eq!(records.as_array().unwrap().len(), 3);
        assert_eq!(records[2]["itemId"], "1001");

        let err = normalize_workbook_json(SAMPLE_CSV.as_bytes()).unwrap_err();
        assert!(err.starts_with("WORKBOOK_PARSE_ERROR"));

        let mut session = DashboardSession::new();
        let stats = session.ingest_table(TableFormat::Xlsx, &bytes).unwrap();
        let stats: Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(stats["totalTransactions"], 3);
    }

    #[test]
    fn test_filter_by_category() {
        let filtered = filter_records_json(&sample_records_json(), r#"{"category": "Lubricants"}"#)
            .unwrap();
        let filtered: Value = serde_json::from_str(&filtered).unwrap();
        assert_eq!(filtered.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_turnover_table_json() {
        let table = turnover_table_json(&sample_records_json(), None, None, None).unwrap();
        let table: Value = serde_json::from_str(&table).unwrap();
        assert_eq!(table["totalItems"], 2);
        assert_eq!(table["rows"][0]["itemId"], "I1");
        assert_eq!(table["rows"][0]["status"], "High");
        assert_eq!(table["rows"][0]["rank"], 1);

        let ascending =
            turnover_table_json(&sample_records_json(), Some("itr"), Some("asc"), Some(1)).unwrap();
        let ascending: Value = serde_json::from_str(&ascending).unwrap();
        assert_eq!(ascending["rows"].as_array().unwrap().len(), 1);
        assert_eq!(ascending["rows"][0]["itemId"], "I2");

        assert!(turnover_table_json(&sample_records_json(), Some("colour"), None, None).is_err());
    }

    #[test]
    fn test_classify_item_turnover_json() {
        let result = classify_item_turnover_json(&sample_records_json(), "I2").unwrap();
        let result: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(result["status"], "Low");
    }

    #[test]
    fn test_monthly_trend_buckets() {
        let trend = trend_json(&sample_records_json(), Some("monthly"), Granularity::Daily).unwrap();
        let trend: Value = serde_json::from_str(&trend).unwrap();
        assert_eq!(trend.as_array().unwrap().len(), 2);
        assert_eq!(trend[0]["label"], "Jan 2024");
    }

    #[test]
    fn test_session_ingest_and_view() {
        let mut session = DashboardSession::new();
        let stats = session.ingest_table(TableFormat::Csv, SAMPLE_CSV.as_bytes()).unwrap();
        let stats: Value = serde_json::from_str(&stats).unwrap();
        assert_eq!(stats["totalItems"], 2);
        assert!(!session.is_busy());

        let view = session.view_json(None).unwrap();
        let view: Value = serde_json::from_str(&view).unwrap();
        assert_eq!(view["filteredRecords"], 4);
    }

    #[test]
    fn test_session_failed_commit_releases_busy_flag() {
        let mut session = DashboardSession::new();
        session.ingest_table(TableFormat::Csv, SAMPLE_CSV.as_bytes()).unwrap();

        session.inner.begin_ingest().unwrap();
        assert!(session.is_busy());
        assert!(session.commit_table(TableFormat::Json, b"not json").is_err());
        assert!(!session.is_busy());
        assert_eq!(session.inner.snapshot().len(), 4);
    }
}
