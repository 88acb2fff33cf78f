//! Error types for the I/O edges (tuning files, preferences store).
//!
//! The simulation itself never fails; only loading and flushing data can.

use thiserror::Error;

/// Errors that can occur when loading a tuning file.
#[derive(Debug, Error)]
pub enum TuningError {
    /// File could not be read.
    #[error("Failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("Tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside the range the simulation can work with.
    #[error("Invalid tuning value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors from the preferences store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Preferences I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file did not contain a JSON object.
    #[error("Preferences encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
