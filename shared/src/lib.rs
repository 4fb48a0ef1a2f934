//! Shared core of the Inventory Analytics Dashboard
//!
//! Record normalization, filtering, aggregation, turnover ranking, and
//! summary statistics. Used by the browser bindings (via WASM) and by the
//! command-line tool.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod session;
pub mod stats;
pub mod turnover;
pub mod types;
pub mod view;

pub use error::{IngestError, IngestResult};
pub use ingest::{load_records, read_file_rows, read_rows, TableFormat};
pub use models::*;
pub use normalize::{normalize_row, normalize_rows, RawRow, RawValue};
pub use session::Session;
pub use types::*;
pub use view::{apply_filter, DashboardView, Snapshot, ViewOptions};
