//! # Error Types
//!
//! Errors shared by every index crate.

use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// Key not found.
    #[error("Key not found in KV store")]
    NotFound,
}

/// How a caller should treat an index failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The requested record does not exist. Not an error for readers.
    NotFound,
    /// Persisted index data disagrees with itself or with block storage.
    /// The node must not keep serving from this index.
    ConsistencyViolation,
    /// The caller passed an argument outside the accepted domain.
    InputViolation,
    /// The underlying store failed.
    StoreFailure,
}

impl ErrorClass {
    /// Returns true if the failure must halt the node.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorClass::ConsistencyViolation | ErrorClass::StoreFailure)
    }
}
