//! Error types for octolog-archive.

use std::path::PathBuf;

/// Result type for octolog-archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in octolog-archive.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSV serialization or parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to create the archive directory.
    #[error("Failed to create archive directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
