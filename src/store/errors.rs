//! Store error types.

use thiserror::Error;

use crate::db::DbError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the note store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store failure
    #[error("database: {0}")]
    Database(#[from] DbError),

    /// State lock poisoned by a panicking holder
    #[error("store state lock poisoned")]
    LockPoisoned,

    /// A blocking persistence task panicked or was cancelled
    #[error("persistence task failed: {0}")]
    TaskFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_converts() {
        let db_err = DbError::LockPoisoned;
        let err: StoreError = db_err.into();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn test_display_includes_cause() {
        let err = StoreError::TaskFailed("cancelled".to_string());
        assert!(err.to_string().contains("cancelled"));
    }
}
