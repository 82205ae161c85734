//! Test fixtures shared by integration flows and benchmarks.

use std::sync::Arc;

use primitive_types::U256;
use qc_03_lookup_index::MemoryBodyProvider;
use qc_index_service::{IndexService, IndexServiceConfig};
use rand::Rng;
use shared_types::{Block, BlockHeader, Hash, InMemoryKVStore, Transaction, Vote};

/// Service over in-memory storage with a shared body source.
pub type MemoryIndexService = IndexService<InMemoryKVStore, Arc<MemoryBodyProvider>>;

pub fn random_hash() -> Hash {
    rand::thread_rng().gen()
}

pub fn random_tx() -> Transaction {
    let mut rng = rand::thread_rng();
    Transaction {
        from: rng.gen(),
        to: Some(rng.gen()),
        value: rng.gen_range(1..1_000_000),
        nonce: rng.gen(),
        data: vec![],
        signature: [0u8; 64],
    }
}

pub fn vote_on(tx_index: u64, node_id: &str) -> Vote {
    Vote {
        data_hash: random_hash(),
        tx_index,
        is_exist: U256::one(),
        node_id: node_id.to_string(),
        ..Default::default()
    }
}

/// Block at `height` linked to `parent`.
pub fn block_at(height: u64, parent: Hash, tx_count: usize, votes: Vec<Vote>) -> Block {
    let header = BlockHeader {
        version: 1,
        height,
        parent_hash: parent,
        timestamp: 1_700_000_000 + height * 12,
        ..Default::default()
    };
    Block::new(header, (0..tx_count).map(|_| random_tx()).collect(), votes)
}

/// `count` linked blocks starting at height 0, each with `tx_count` transactions.
pub fn chain(count: u64, tx_count: usize) -> Vec<Block> {
    let mut parent = [0u8; 32];
    (0..count)
        .map(|height| {
            let block = block_at(height, parent, tx_count, vec![]);
            parent = block.hash();
            block
        })
        .collect()
}

/// Service plus the body source it reads from.
pub fn memory_service(config: IndexServiceConfig) -> (MemoryIndexService, Arc<MemoryBodyProvider>) {
    let bodies = Arc::new(MemoryBodyProvider::new());
    let service = IndexService::new(InMemoryKVStore::new(), Arc::clone(&bodies), config)
        .expect("valid test config");
    (service, bodies)
}

/// Store the body and index the block, as block commit does.
pub fn commit(service: &mut MemoryIndexService, bodies: &MemoryBodyProvider, block: &Block) {
    bodies.insert_block(block);
    service.index_block(block).expect("block indexes");
}
