//! Report error types.

use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// The report file or its directory could not be created.
    #[error("Failed to create report at '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested format is not supported.
    #[error("Unknown report format '{format}' (expected 'csv' or 'json')")]
    UnknownFormat { format: String },
}
