//! # Domain Errors
//!
//! Not found is never an error here: reads return `Ok(None)`. Everything
//! below is either a consistency violation (the index disagrees with itself
//! or with block storage) or a store failure.

use shared_types::{EntityKind, ErrorClass, Hash, KVStoreError};
use thiserror::Error;

use super::entities::LookupKey;

/// Errors that can occur during lookup index operations.
#[derive(Debug, Clone, Error)]
pub enum IndexingError {
    /// A stored entry could not be decoded.
    #[error("corrupt {kind} lookup entry for {key}: {reason}")]
    EntryDecode {
        kind: EntityKind,
        key: LookupKey,
        reason: String,
    },

    /// An entry could not be encoded for writing.
    #[error("failed to encode {kind} lookup entry for {key} in block #{block_number}: {reason}")]
    EntryEncode {
        kind: EntityKind,
        key: LookupKey,
        block_number: u64,
        reason: String,
    },

    /// An entry points at a block whose body is missing.
    #[error("{kind} {key} points at block #{block_number} (0x{}) but its body is missing", hex::encode(.block_hash))]
    MissingBody {
        kind: EntityKind,
        key: LookupKey,
        block_hash: Hash,
        block_number: u64,
    },

    /// An entry points past the end of the block's item collection.
    #[error("{kind} {key} points at index {index} of block #{block_number} (0x{}) which holds {len}", hex::encode(.block_hash))]
    ItemOutOfBounds {
        kind: EntityKind,
        key: LookupKey,
        block_hash: Hash,
        block_number: u64,
        index: u64,
        len: u64,
    },

    /// A vote references a transaction index the block does not have.
    #[error("vote {vote_index} of block #{block_number} (0x{}) references transaction {tx_index} of {tx_count}", hex::encode(.block_hash))]
    DanglingVoteReference {
        block_hash: Hash,
        block_number: u64,
        vote_index: u64,
        tx_index: u64,
        tx_count: u64,
    },

    /// The key-value store failed.
    #[error("store {operation} failed for {kind} {key}: {source}")]
    Store {
        kind: EntityKind,
        operation: &'static str,
        key: LookupKey,
        #[source]
        source: KVStoreError,
    },

    /// The block body source failed.
    #[error("reading body of block #{block_number} (0x{}) for {kind} lookup failed: {source}", hex::encode(.block_hash))]
    BodySource {
        kind: EntityKind,
        block_hash: Hash,
        block_number: u64,
        #[source]
        source: KVStoreError,
    },
}

impl IndexingError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::EntryDecode { .. }
            | Self::MissingBody { .. }
            | Self::ItemOutOfBounds { .. }
            | Self::DanglingVoteReference { .. } => ErrorClass::ConsistencyViolation,
            Self::EntryEncode { .. } | Self::Store { .. } | Self::BodySource { .. } => {
                ErrorClass::StoreFailure
            }
        }
    }

    pub fn is_consistency_violation(&self) -> bool {
        self.class() == ErrorClass::ConsistencyViolation
    }

    /// Number of the block the failure concerns, when known.
    pub fn block_number(&self) -> Option<u64> {
        match self {
            Self::EntryEncode { block_number, .. }
            | Self::MissingBody { block_number, .. }
            | Self::ItemOutOfBounds { block_number, .. }
            | Self::DanglingVoteReference { block_number, .. }
            | Self::BodySource { block_number, .. } => Some(*block_number),
            Self::EntryDecode { .. } | Self::Store { .. } => None,
        }
    }
}
