//! In-memory block body source.

use std::collections::HashMap;

use parking_lot::RwLock;
use shared_types::{Block, BlockBody, Hash, KVStoreError};

use crate::ports::BlockBodyProvider;

/// Block bodies held in memory, keyed by `(hash, number)`.
#[derive(Debug, Default)]
pub struct MemoryBodyProvider {
    bodies: RwLock<HashMap<(Hash, u64), BlockBody>>,
}

impl MemoryBodyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, block_hash: Hash, block_number: u64, body: BlockBody) {
        self.bodies.write().insert((block_hash, block_number), body);
    }

    /// Store the body of `block` under its own hash and number.
    pub fn insert_block(&self, block: &Block) {
        self.insert(block.hash(), block.number(), block.body());
    }

    pub fn remove(&self, block_hash: &Hash, block_number: u64) -> Option<BlockBody> {
        self.bodies.write().remove(&(*block_hash, block_number))
    }

    pub fn len(&self) -> usize {
        self.bodies.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.read().is_empty()
    }
}

impl BlockBodyProvider for MemoryBodyProvider {
    fn read_body(
        &self,
        block_hash: &Hash,
        block_number: u64,
    ) -> Result<Option<BlockBody>, KVStoreError> {
        Ok(self.bodies.read().get(&(*block_hash, block_number)).cloned())
    }
}
