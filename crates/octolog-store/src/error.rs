//! Error types for octolog-store.

use std::path::PathBuf;

/// Result type for octolog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in octolog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored timestamp is outside the representable range.
    #[error("Invalid timestamp in store: {0}")]
    InvalidTimestamp(i64),

    /// The store is temporarily unreachable (connection drop, timeout).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
