//! Engine error types

use morphalign_core::CoreError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while orchestrating annotation runs
#[derive(Error, Debug)]
pub enum EngineError {
    /// Core alignment error
    #[error("alignment failed: {0}")]
    Core(#[from] CoreError),

    /// I/O error on a job file
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File the operation failed on
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EngineError {
    /// Attach the failing path to an I/O error
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
