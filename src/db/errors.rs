//! Database error types.

use thiserror::Error;

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Errors from the SQLite layer
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite failure
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection lock poisoned by a panicking holder
    #[error("connection lock poisoned")]
    LockPoisoned,
}
