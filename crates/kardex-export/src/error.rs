//! Export errors.

use thiserror::Error;

/// Error raised while rendering or delivering a document.
///
/// Rendering happens entirely in memory before the sink is touched, so a
/// failure here never leaves a half-written report behind a successful
/// reconstruction.
#[derive(Debug, Error)]
pub enum ExportError {
    /// I/O error while writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML writer error.
    #[error("XML error: {0}")]
    Xml(String),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid strftime date format.
    #[error("invalid date format: {0:?}")]
    DateFormat(String),

    /// The document sink refused the document.
    #[error("document sink error: {0}")]
    Sink(String),
}

/// Result type used across the exporters.
pub type Result<T> = std::result::Result<T, ExportError>;

pub(crate) fn xml<E: std::fmt::Display>(e: E) -> ExportError {
    ExportError::Xml(e.to_string())
}
