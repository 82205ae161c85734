//! # Outbound Ports (Driven Ports)

use std::sync::Arc;

use shared_types::{BlockBody, Hash, KVStoreError};
use thiserror::Error;

use crate::domain::LookupEntry;

/// A codec failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodecError {
    pub message: String,
}

impl CodecError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Byte encoding of persisted lookup entries.
///
/// `decode(encode(e)) == e` must hold for every entry.
pub trait LookupEntryCodec: Send + Sync {
    fn encode(&self, entry: &LookupEntry) -> Result<Vec<u8>, CodecError>;

    fn decode(&self, bytes: &[u8]) -> Result<LookupEntry, CodecError>;
}

/// Interface for reading block bodies from block storage.
///
/// Bodies are addressed by `(hash, number)`, exactly as a lookup entry
/// records them.
pub trait BlockBodyProvider: Send + Sync {
    /// `Ok(None)` if no body is stored for the block.
    fn read_body(
        &self,
        block_hash: &Hash,
        block_number: u64,
    ) -> Result<Option<BlockBody>, KVStoreError>;
}

impl<T: BlockBodyProvider + ?Sized> BlockBodyProvider for Arc<T> {
    fn read_body(
        &self,
        block_hash: &Hash,
        block_number: u64,
    ) -> Result<Option<BlockBody>, KVStoreError> {
        (**self).read_body(block_hash, block_number)
    }
}
