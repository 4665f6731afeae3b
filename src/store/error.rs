//! Store error types
//!
//! Defines all errors that can occur in the record store.

use thiserror::Error;

/// Errors that can occur in the diary store
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite statement or connection failure
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored row could not be decoded into a diary entry
    #[error("Corrupt data: {0}")]
    Corruption(String),

    /// Save was called for a row that does not exist
    #[error("Diary row not found: {0}")]
    MissingRow(i64),

    /// Lock acquisition failed
    #[error("Lock error: {0}")]
    Lock(String),
}

/// Result type alias for store operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::MissingRow(42);
        assert_eq!(err.to_string(), "Diary row not found: 42");

        let err = StorageError::Corruption("bad date".to_string());
        assert_eq!(err.to_string(), "Corrupt data: bad date");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }
}
