//! Store error types.

use thiserror::Error;

/// Errors from catalog store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Replacing or upserting catalog entries failed.
    #[error("catalog write failed: {0}")]
    Write(String),

    /// Reading catalog entries failed.
    #[error("catalog read failed: {0}")]
    Read(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Vehicle types could not be encoded to or decoded from JSON.
    #[error("vehicle types encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// A writer panicked while holding the in-memory catalog.
    #[error("catalog lock poisoned")]
    Poisoned,
}
