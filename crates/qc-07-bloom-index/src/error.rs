//! Error types for the bloom index

use shared_types::{ErrorClass, Hash, KVStoreError};
use thiserror::Error;

/// Filter construction and query errors. All are input violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BloomError {
    #[error("Bloom bytes too long: {len} > {max}")]
    BytesTooLong { len: usize, max: usize },

    #[error("Value too short for bloom derivation: {len} < {min} bytes")]
    ValueTooShort { len: usize, min: usize },

    #[error("Cannot merge an empty list of blooms")]
    EmptyMerge,

    #[error("Invalid bloom hex: {0}")]
    InvalidHex(String),
}

impl BloomError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::InputViolation
    }
}

/// Section geometry and bit-plane assembly errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("Invalid section size: {size} (must be a positive multiple of 8, at most {})", crate::domain::generator::MAX_SECTION_SIZE)]
    InvalidSectionSize { size: u64 },

    #[error("Generator holds section {building}, cannot write it as section {requested}")]
    SectionMismatch { building: u64, requested: u64 },

    #[error("Bloom out of order: expected section index {expected}, got {got}")]
    OutOfOrder { expected: u64, got: u64 },

    #[error("Section full: all {size} blooms already added")]
    SectionFull { size: u64 },

    #[error("Section incomplete: {filled} of {size} blooms added")]
    Incomplete { filled: u64, size: u64 },

    #[error("Bit index out of range: {bit} >= {max}")]
    InvalidBit { bit: usize, max: usize },
}

impl GeneratorError {
    pub fn class(&self) -> ErrorClass {
        ErrorClass::InputViolation
    }
}

/// Bit-plane persistence errors
#[derive(Debug, Clone, Error)]
pub enum PlaneStoreError {
    #[error("Bit plane {bit} of section {section} (head 0x{}) not found", hex::encode(.head))]
    NotFound { bit: usize, section: u64, head: Hash },

    #[error("Bit index out of range: {bit} >= {max}")]
    InvalidBit { bit: usize, max: usize },

    #[error("Bit plane length {len} does not match section ({expected} bytes)")]
    InvalidPlaneLength { len: usize, expected: usize },

    #[error("Section {section} is beyond the addressable block range")]
    SectionOutOfRange { section: u64 },

    #[error("Section error: {0}")]
    Section(#[from] GeneratorError),

    #[error("Store {operation} failed for bit plane {bit} of section {section}: {source}")]
    Store {
        operation: &'static str,
        bit: usize,
        section: u64,
        #[source]
        source: KVStoreError,
    },
}

impl PlaneStoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::InvalidBit { .. }
            | Self::InvalidPlaneLength { .. }
            | Self::SectionOutOfRange { .. }
            | Self::Section(_) => ErrorClass::InputViolation,
            Self::Store { .. } => ErrorClass::StoreFailure,
        }
    }

    /// True for errors a speculative probe may ignore.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Store { .. })
    }
}
