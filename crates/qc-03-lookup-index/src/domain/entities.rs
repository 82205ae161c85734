//! # Lookup Entities
//!
//! - [`LookupEntry`]: where an item lives
//! - [`LookupKey`]: what an item is called
//! - [`IndexedEntity`]: how a kind of item is found in a block

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{keys, Block, BlockBody, EntityKind, Hash, Transaction, Vote};

use super::errors::IndexingError;

/// Position of an item in the chain.
///
/// Immutable once written. The all-zero value is the "not found" locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LookupEntry {
    /// Hash of the containing block.
    pub block_hash: Hash,
    /// Number (height) of the containing block.
    pub block_number: u64,
    /// Position of the item inside its block collection.
    pub index: u64,
}

impl LookupEntry {
    pub fn new(block_hash: Hash, block_number: u64, index: u64) -> Self {
        Self {
            block_hash,
            block_number,
            index,
        }
    }

    /// True for the zero locator.
    pub fn is_zero(&self) -> bool {
        shared_types::is_zero_hash(&self.block_hash) && self.block_number == 0 && self.index == 0
    }

    /// The `(block_hash, block_number, index)` triple.
    pub fn locator(&self) -> (Hash, u64, u64) {
        (self.block_hash, self.block_number, self.index)
    }
}

/// Identity of an indexed item.
///
/// Transactions are identified by their hash alone. Votes are identified by
/// the hash of the transaction they reference plus the id of the signing
/// node, so two nodes voting on one transaction get two entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub hash: Hash,
    pub secondary_id: Option<String>,
}

impl LookupKey {
    pub fn transaction(hash: Hash) -> Self {
        Self {
            hash,
            secondary_id: None,
        }
    }

    pub fn vote(tx_hash: Hash, node_id: impl Into<String>) -> Self {
        Self {
            hash: tx_hash,
            secondary_id: Some(node_id.into()),
        }
    }

    /// Storage key of this identity in the namespace of `kind`.
    pub fn storage_key(&self, kind: EntityKind) -> Vec<u8> {
        keys::lookup_key(kind, &self.hash, self.secondary_id.as_deref())
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.hash))?;
        if let Some(node_id) = &self.secondary_id {
            write!(f, "/{node_id}")?;
        }
        Ok(())
    }
}

/// An item read back through the index, together with its locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedItem<T> {
    pub item: T,
    pub entry: LookupEntry,
}

/// A kind of block item the lookup index tracks.
pub trait IndexedEntity {
    /// The item type stored in the block body.
    type Item: Clone;

    /// Namespace of this kind.
    const KIND: EntityKind;

    /// Lookup keys of every item of this kind in `block`, in body order.
    ///
    /// Position `i` of the result is the key of item `i`.
    fn lookup_keys(block: &Block) -> Result<Vec<LookupKey>, IndexingError>;

    /// The body collection entries of this kind index into.
    fn items(body: &BlockBody) -> &[Self::Item];
}

/// Transactions, keyed by transaction hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionEntity;

impl IndexedEntity for TransactionEntity {
    type Item = Transaction;
    const KIND: EntityKind = EntityKind::Transaction;

    fn lookup_keys(block: &Block) -> Result<Vec<LookupKey>, IndexingError> {
        Ok(block
            .transactions
            .iter()
            .map(|tx| LookupKey::transaction(tx.hash()))
            .collect())
    }

    fn items(body: &BlockBody) -> &[Transaction] {
        &body.transactions
    }
}

/// Votes, keyed by (referenced transaction hash, node id).
#[derive(Debug, Clone, Copy, Default)]
pub struct VoteEntity;

impl IndexedEntity for VoteEntity {
    type Item = Vote;
    const KIND: EntityKind = EntityKind::Vote;

    fn lookup_keys(block: &Block) -> Result<Vec<LookupKey>, IndexingError> {
        block
            .votes
            .iter()
            .enumerate()
            .map(|(vote_index, vote)| {
                let tx = usize::try_from(vote.tx_index)
                    .ok()
                    .and_then(|i| block.transactions.get(i))
                    .ok_or_else(|| IndexingError::DanglingVoteReference {
                        block_hash: block.hash(),
                        block_number: block.number(),
                        vote_index: vote_index as u64,
                        tx_index: vote.tx_index,
                        tx_count: block.transactions.len() as u64,
                    })?;
                Ok(LookupKey::vote(tx.hash(), vote.node_id.clone()))
            })
            .collect()
    }

    fn items(body: &BlockBody) -> &[Vote] {
        &body.votes
    }
}
