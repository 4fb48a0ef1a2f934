//! Session host
//!
//! Owns the mutable side of the dashboard: the current snapshot, the filter
//! state, and the ingestion busy flag. Everything it hands out is derived by
//! the pure functions in [`crate::view`].

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{IngestError, IngestResult};
use crate::ingest::{read_rows, TableFormat};
use crate::models::{FilterState, InventoryRecord, ItemTurnoverStatus};
use crate::normalize::{normalize_rows_with_report, RawRow};
use crate::turnover::classify_item;
use crate::view::{apply_filter, DashboardView, Snapshot, ViewOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ViewKey {
    version: Uuid,
    filter: FilterState,
    options: ViewOptions,
}

/// In-memory dashboard session
#[derive(Debug)]
pub struct Session {
    snapshot: Arc<Snapshot>,
    filter: FilterState,
    busy: bool,
    memo: Option<(ViewKey, DashboardView)>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session with no data
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Session preloaded with records (e.g. a bundled dataset)
    pub fn with_records(records: Vec<InventoryRecord>) -> Self {
        let snapshot = Snapshot::new(records);
        let filter = FilterState::seeded(snapshot.stats());
        Self {
            snapshot: Arc::new(snapshot),
            filter,
            busy: false,
            memo: None,
        }
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Mark an ingestion as in flight; only one may run at a time
    pub fn begin_ingest(&mut self) -> IngestResult<()> {
        if self.busy {
            tracing::warn!("Rejected ingestion while another is in progress");
            return Err(IngestError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    /// Replace the snapshot with the normalized rows and reseed the filter
    pub fn commit_ingest(&mut self, rows: &[RawRow]) -> IngestResult<Arc<Snapshot>> {
        if !self.busy {
            return Err(IngestError::NotStarted);
        }
        let (records, report) = normalize_rows_with_report(rows);
        tracing::info!(
            rows = report.rows,
            defaulted = report.defaulted,
            coerced = report.coerced,
            "Normalized uploaded rows"
        );
        Ok(self.install(records))
    }

    /// Like [`Session::commit_ingest`] for records normalized elsewhere
    pub fn commit_records(&mut self, records: Vec<InventoryRecord>) -> IngestResult<Arc<Snapshot>> {
        if !self.busy {
            return Err(IngestError::NotStarted);
        }
        Ok(self.install(records))
    }

    /// Give up on the in-flight ingestion; the current snapshot stays
    pub fn abort_ingest(&mut self) {
        if self.busy {
            tracing::warn!(version = %self.snapshot.version(), "Ingestion aborted, keeping current data");
        }
        self.busy = false;
    }

    /// Decode, normalize, and install a table in one call
    pub fn ingest(&mut self, format: TableFormat, bytes: &[u8]) -> IngestResult<Arc<Snapshot>> {
        self.begin_ingest()?;
        match read_rows(format, bytes) {
            Ok(rows) => self.commit_ingest(&rows),
            Err(e) => {
                tracing::warn!(error = %e, %format, "Failed to ingest table");
                self.abort_ingest();
                Err(e)
            }
        }
    }

    fn install(&mut self, records: Vec<InventoryRecord>) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::new(records));
        tracing::info!(
            version = %snapshot.version(),
            records = snapshot.len(),
            items = snapshot.stats().total_items,
            "Loaded inventory snapshot"
        );
        self.filter = FilterState::seeded(snapshot.stats());
        self.snapshot = Arc::clone(&snapshot);
        self.memo = None;
        self.busy = false;
        snapshot
    }

    // ========================================================================
    // Filtering and views
    // ========================================================================

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Edit the filter in place
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut FilterState)) {
        edit(&mut self.filter);
    }

    /// Drop every constraint
    pub fn clear_filter(&mut self) {
        self.filter = FilterState::cleared();
    }

    /// Current view; recomputed only when the snapshot, filter, or options change
    pub fn view(&mut self, options: &ViewOptions) -> &DashboardView {
        let key = ViewKey {
            version: self.snapshot.version(),
            filter: self.filter.clone(),
            options: *options,
        };
        let stale = self
            .memo
            .as_ref()
            .map_or(true, |(cached, _)| *cached != key);
        if stale {
            self.memo = None;
        }

        let snapshot = &self.snapshot;
        let filter = &self.filter;
        let (_, view) = self
            .memo
            .get_or_insert_with(|| (key, apply_filter(snapshot, filter, options)));
        view
    }

    /// Whole-history ITR of one item, classified per item
    pub fn item_turnover(&self, item_id: &str) -> (Decimal, ItemTurnoverStatus) {
        classify_item(self.snapshot.records(), item_id)
    }
}
