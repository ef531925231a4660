//! Error types for manifest-driven dataset operations.
//!
//! Only file-level failures live here. Problems with a single row or a single
//! image are reported as diagnostics next to the result instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures that abort a whole operation.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required manifest file does not exist.
    #[error("manifest not found: {0}")]
    NotFound(PathBuf),

    /// The manifest has no rows at all, not even a header.
    #[error("malformed manifest {path}: {reason}")]
    Malformed {
        /// Manifest path.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The manifest has a header but no data rows.
    #[error("manifest {0} contains no data rows")]
    Empty(PathBuf),

    /// The CSV reader could not decode the file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure while reading, writing or copying.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DatasetError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(path.as_ref().to_path_buf())
    }

    /// Creates a malformed manifest error.
    #[must_use]
    pub fn malformed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Creates an empty manifest error.
    #[must_use]
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self::Empty(path.as_ref().to_path_buf())
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
