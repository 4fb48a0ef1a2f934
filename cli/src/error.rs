//! Error handling for the inventory dashboard CLI

use shared::IngestError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Output encoding error: {0}")]
    Output(String),
}

impl CliError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("JSON serialization error: {}", e))
    }
}

/// Result type alias for CLI operations
pub type AppResult<T> = Result<T, CliError>;
