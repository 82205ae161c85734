//! Error types for the index service

use qc_03_lookup_index::IndexingError;
use qc_07_bloom_index::{BloomError, GeneratorError, PlaneStoreError};
use shared_types::ErrorClass;
use thiserror::Error;

/// Errors surfaced by [`crate::IndexService`]
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Indexing(#[from] IndexingError),

    #[error(transparent)]
    Bloom(#[from] BloomError),

    #[error(transparent)]
    PlaneStore(#[from] PlaneStoreError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl ServiceError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Indexing(e) => e.class(),
            Self::Bloom(e) => e.class(),
            Self::PlaneStore(e) => e.class(),
            Self::Generator(e) => e.class(),
            Self::Config(_) | Self::Telemetry(_) => ErrorClass::InputViolation,
        }
    }

    pub fn is_consistency_violation(&self) -> bool {
        self.class() == ErrorClass::ConsistencyViolation
    }
}
