//! Report output encoders

use serde::Serialize;

use crate::error::{AppResult, CliError};

/// Export rows as CSV with a header line taken from the field names
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| CliError::Output(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| CliError::Output(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| CliError::Output(format!("UTF-8 conversion error: {}", e)))
}

/// Pretty-printed JSON
pub fn export_to_json<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
