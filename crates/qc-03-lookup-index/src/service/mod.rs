//! # Lookup Index Service
//!
//! [`LookupIndex`] persists one [`LookupEntry`] per item of its kind and
//! resolves them back to items through a [`BlockBodyProvider`].
//!
//! The index holds no state besides its codec; the store is passed to every
//! call so writes take `&mut` and reads take `&`.

use std::marker::PhantomData;

use shared_types::{Block, EntityKind, Hash, KeyValueStore};
use tracing::debug;

use crate::adapters::RlpEntryCodec;
use crate::domain::{
    IndexedEntity, IndexingError, LocatedItem, LookupEntry, LookupKey, TransactionEntity,
    VoteEntity,
};
use crate::ports::{BlockBodyProvider, LookupEntryCodec};


/// Generic hash to block-locator index for one entity kind.
pub struct LookupIndex<E: IndexedEntity, C: LookupEntryCodec = RlpEntryCodec> {
    codec: C,
    _entity: PhantomData<fn() -> E>,
}

/// Transaction hash → locator.
pub type TransactionLookup<C = RlpEntryCodec> = LookupIndex<TransactionEntity, C>;

/// (transaction hash, node id) → vote locator.
pub type VoteLookup<C = RlpEntryCodec> = LookupIndex<VoteEntity, C>;

impl<E: IndexedEntity> LookupIndex<E, RlpEntryCodec> {
    pub fn new() -> Self {
        Self::with_codec(RlpEntryCodec)
    }
}

impl<E: IndexedEntity> Default for LookupIndex<E, RlpEntryCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: IndexedEntity, C: LookupEntryCodec> LookupIndex<E, C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            _entity: PhantomData,
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::KIND
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Write one entry per item of this kind in `block`.
    ///
    /// Item `i` is recorded as `(block.hash, block.number, i)`. Returns the
    /// number of entries written. A failure aborts the pass; entries already
    /// written for the block stay and are overwritten by a retry.
    pub fn write_entries<S>(&self, store: &mut S, block: &Block) -> Result<usize, IndexingError>
    where
        S: KeyValueStore + ?Sized,
    {
        let keys = E::lookup_keys(block)?;
        let block_hash = block.hash();
        let block_number = block.number();

        for (position, key) in keys.iter().enumerate() {
            let entry = LookupEntry::new(block_hash, block_number, position as u64);
            let value = self
                .codec
                .encode(&entry)
                .map_err(|e| IndexingError::EntryEncode {
                    kind: E::KIND,
                    key: key.clone(),
                    block_number,
                    reason: e.to_string(),
                })?;
            store
                .put(&key.storage_key(E::KIND), &value)
                .map_err(|source| IndexingError::Store {
                    kind: E::KIND,
                    operation: "put",
                    key: key.clone(),
                    source,
                })?;
        }

        debug!(
            kind = %E::KIND,
            block_number,
            block_hash = %hex::encode(block_hash),
            count = keys.len(),
            "lookup entries written"
        );
        Ok(keys.len())
    }

    /// Read the entry stored for `key`.
    ///
    /// An absent key and an empty stored value both read as `Ok(None)`.
    pub fn read_entry<S>(
        &self,
        store: &S,
        key: &LookupKey,
    ) -> Result<Option<LookupEntry>, IndexingError>
    where
        S: KeyValueStore + ?Sized,
    {
        let raw = store
            .get(&key.storage_key(E::KIND))
            .map_err(|source| IndexingError::Store {
                kind: E::KIND,
                operation: "get",
                key: key.clone(),
                source,
            })?;

        match raw {
            None => Ok(None),
            Some(bytes) if bytes.is_empty() => Ok(None),
            Some(bytes) => self
                .codec
                .decode(&bytes)
                .map(Some)
                .map_err(|e| IndexingError::EntryDecode {
                    kind: E::KIND,
                    key: key.clone(),
                    reason: e.to_string(),
                }),
        }
    }

    /// Locator triple for `key`; the zero triple when absent.
    pub fn read_locator<S>(&self, store: &S, key: &LookupKey) -> Result<(Hash, u64, u64), IndexingError>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(self.read_entry(store, key)?.unwrap_or_default().locator())
    }

    /// Remove the entry for `key`. Removing an absent entry succeeds.
    pub fn delete_entry<S>(&self, store: &mut S, key: &LookupKey) -> Result<(), IndexingError>
    where
        S: KeyValueStore + ?Sized,
    {
        store
            .delete(&key.storage_key(E::KIND))
            .map_err(|source| IndexingError::Store {
                kind: E::KIND,
                operation: "delete",
                key: key.clone(),
                source,
            })
    }

    /// Remove every entry `write_entries(block)` would have written.
    pub fn delete_entries<S>(&self, store: &mut S, block: &Block) -> Result<usize, IndexingError>
    where
        S: KeyValueStore + ?Sized,
    {
        let keys = E::lookup_keys(block)?;
        for key in &keys {
            self.delete_entry(store, key)?;
        }

        debug!(
            kind = %E::KIND,
            block_number = block.number(),
            block_hash = %hex::encode(block.hash()),
            count = keys.len(),
            "lookup entries deleted"
        );
        Ok(keys.len())
    }

    /// Resolve `key` to the item it names.
    ///
    /// `Ok(None)` if no entry exists. An entry whose block body is missing,
    /// or whose index is past the end of the body collection, is a
    /// consistency violation.
    pub fn read_item<S, B>(
        &self,
        store: &S,
        bodies: &B,
        key: &LookupKey,
    ) -> Result<Option<LocatedItem<E::Item>>, IndexingError>
    where
        S: KeyValueStore + ?Sized,
        B: BlockBodyProvider + ?Sized,
    {
        let Some(entry) = self.read_entry(store, key)? else {
            return Ok(None);
        };

        let body = bodies
            .read_body(&entry.block_hash, entry.block_number)
            .map_err(|source| IndexingError::BodySource {
                kind: E::KIND,
                block_hash: entry.block_hash,
                block_number: entry.block_number,
                source,
            })?
            .ok_or_else(|| IndexingError::MissingBody {
                kind: E::KIND,
                key: key.clone(),
                block_hash: entry.block_hash,
                block_number: entry.block_number,
            })?;

        let items = E::items(&body);
        let item = usize::try_from(entry.index)
            .ok()
            .and_then(|i| items.get(i))
            .ok_or_else(|| IndexingError::ItemOutOfBounds {
                kind: E::KIND,
                key: key.clone(),
                block_hash: entry.block_hash,
                block_number: entry.block_number,
                index: entry.index,
                len: items.len() as u64,
            })?;

        Ok(Some(LocatedItem {
            item: item.clone(),
            entry,
        }))
    }
}
