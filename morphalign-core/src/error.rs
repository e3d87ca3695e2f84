//! Core error types
//!
//! Every variant is recoverable at the single-document-run boundary: one
//! bad document never aborts a batch.

use thiserror::Error;

/// Errors raised during one document's alignment run
#[derive(Error, Debug)]
pub enum CoreError {
    /// Analyzer output stream is malformed
    #[error("analyzer output malformed: {0}")]
    Parse(String),

    /// Document carries no text-region boundary markers
    #[error("no <text> boundary found in document")]
    MissingTextBoundary,

    /// Plain-text and markup coordinate systems could not be reconciled
    #[error("alignment drift at coordinate {coordinate}: {reason}")]
    AlignmentDrift {
        /// Plain-text coordinate at which the drift was detected
        coordinate: usize,
        /// What went out of sync
        reason: String,
    },

    /// Final document could not be written
    #[error("standoff serialization failed: {0}")]
    Serialization(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Parse(err.to_string())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
