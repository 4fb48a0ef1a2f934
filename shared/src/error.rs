//! Errors raised while bringing raw data into the dashboard
//!
//! Only ingestion can fail. Field-level problems are coerced, never reported.

use thiserror::Error;

/// Ingestion failure; the previously loaded data stays in place
#[derive(Error, Debug)]
pub enum IngestError {
    /// csv's own message already reads "CSV parse error: ..."
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook parse error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Input is not a table: {0}")]
    NotATable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Another ingestion is already in progress")]
    Busy,

    #[error("No ingestion in progress")]
    NotStarted,
}

impl IngestError {
    pub fn not_a_table(msg: impl Into<String>) -> Self {
        Self::NotATable(msg.into())
    }

    /// Short machine-readable code, used by the browser bindings
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::Csv(_) => "CSV_PARSE_ERROR",
            IngestError::Json(_) => "JSON_PARSE_ERROR",
            IngestError::Workbook(_) => "WORKBOOK_PARSE_ERROR",
            IngestError::NotATable(_) => "NOT_A_TABLE",
            IngestError::Io(_) => "IO_ERROR",
            IngestError::Busy => "INGEST_BUSY",
            IngestError::NotStarted => "INGEST_NOT_STARTED",
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;
