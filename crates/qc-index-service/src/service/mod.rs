//! # Index Service
//!
//! Owns the store and the body source, and drives both lookup indexes and
//! the bloom section pipeline for every committed block.
//!
//! Blocks must be indexed in ascending number order for sectioning. A block
//! that does not continue the section under construction discards it; the
//! generator then waits for the next section boundary.

use std::sync::Arc;

use qc_03_lookup_index::{
    BlockBodyProvider, IndexedEntity, LocatedItem, LookupEntry, LookupEntryCodec, LookupIndex,
    LookupKey, RlpEntryCodec, TransactionLookup, VoteEntity, VoteLookup,
};
use qc_07_bloom_index::{Bloom, SectionBloomStore, SectionGenerator};
use shared_types::{Block, ErrorClass, Hash, KeyValueStore, Transaction, Vote};
use tracing::{debug, error, warn};

use crate::config::IndexServiceConfig;
use crate::error::ServiceError;
use crate::metrics::IndexMetrics;


/// Secondary index over committed blocks.
pub struct IndexService<S, B, C = RlpEntryCodec>
where
    S: KeyValueStore,
    B: BlockBodyProvider,
    C: LookupEntryCodec,
{
    store: S,
    bodies: B,
    transactions: TransactionLookup<C>,
    votes: VoteLookup<C>,
    sections: SectionBloomStore,
    generator: Option<SectionGenerator>,
    config: IndexServiceConfig,
    metrics: Arc<IndexMetrics>,
}

impl<S, B> IndexService<S, B, RlpEntryCodec>
where
    S: KeyValueStore,
    B: BlockBodyProvider,
{
    pub fn new(store: S, bodies: B, config: IndexServiceConfig) -> Result<Self, ServiceError> {
        Self::with_codec(store, bodies, RlpEntryCodec, config)
    }
}

impl<S, B, C> IndexService<S, B, C>
where
    S: KeyValueStore,
    B: BlockBodyProvider,
    C: LookupEntryCodec + Clone,
{
    pub fn with_codec(
        store: S,
        bodies: B,
        codec: C,
        config: IndexServiceConfig,
    ) -> Result<Self, ServiceError> {
        config.validate()?;
        let sections = SectionBloomStore::new(config.sections.section_size)?;
        let generator = if config.sections.enabled {
            Some(SectionGenerator::new(config.sections.section_size)?)
        } else {
            None
        };

        Ok(Self {
            store,
            bodies,
            transactions: LookupIndex::with_codec(codec.clone()),
            votes: LookupIndex::with_codec(codec),
            sections,
            generator,
            config,
            metrics: Arc::new(IndexMetrics::new()),
        })
    }
}

impl<S, B, C> IndexService<S, B, C>
where
    S: KeyValueStore,
    B: BlockBodyProvider,
    C: LookupEntryCodec,
{
    // =========================================================================
    // Commit path
    // =========================================================================

    /// Index a committed block and return its bloom.
    ///
    /// The bloom holds every transaction hash of the block.
    pub fn index_block(&mut self, block: &Block) -> Result<Bloom, ServiceError> {
        self.index_block_inner(block)
            .map_err(|e| self.report("index_block", &block_subject(block), e))
    }

    fn index_block_inner(&mut self, block: &Block) -> Result<Bloom, ServiceError> {
        // Reject dangling vote references before any entry lands.
        if self.config.index_votes {
            VoteEntity::lookup_keys(block)?;
        }

        let mut written = self.transactions.write_entries(&mut self.store, block)?;
        if self.config.index_votes {
            written += self.votes.write_entries(&mut self.store, block)?;
        }

        let hashes: Vec<Hash> = block.transactions.iter().map(Transaction::hash).collect();
        let bloom = Bloom::from_hashes(&hashes);

        if let Some(generator) = self.generator.as_mut() {
            let written_section = feed_section(
                generator,
                &self.sections,
                &mut self.store,
                block,
                &bloom,
            )?;
            if written_section.is_some() {
                self.metrics.record_section_written();
            }
        }

        self.metrics.record_block_indexed(written);
        debug!(
            block_number = block.number(),
            block_hash = %hex::encode(block.hash()),
            entries = written,
            bloom_bits = bloom.bits_set(),
            "block indexed"
        );
        Ok(bloom)
    }

    /// Remove every lookup entry `index_block` wrote for `block`.
    ///
    /// Used when a block leaves the canonical chain. Persisted bloom
    /// sections are keyed by head hash and need no removal.
    pub fn unindex_block(&mut self, block: &Block) -> Result<usize, ServiceError> {
        self.unindex_block_inner(block)
            .map_err(|e| self.report("unindex_block", &block_subject(block), e))
    }

    fn unindex_block_inner(&mut self, block: &Block) -> Result<usize, ServiceError> {
        let mut deleted = self.transactions.delete_entries(&mut self.store, block)?;
        if self.config.index_votes {
            deleted += self.votes.delete_entries(&mut self.store, block)?;
        }

        self.metrics.record_block_unindexed(deleted);
        debug!(
            block_number = block.number(),
            block_hash = %hex::encode(block.hash()),
            entries = deleted,
            "block unindexed"
        );
        Ok(deleted)
    }

    // =========================================================================
    // By-hash queries
    // =========================================================================

    pub fn transaction_location(&self, hash: &Hash) -> Result<Option<LookupEntry>, ServiceError> {
        let key = LookupKey::transaction(*hash);
        let found = self
            .transactions
            .read_entry(&self.store, &key)
            .map_err(|e| self.report("transaction_location", &key.to_string(), e.into()))?;
        self.metrics.record_lookup(found.is_some());
        Ok(found)
    }

    pub fn vote_location(
        &self,
        tx_hash: &Hash,
        node_id: &str,
    ) -> Result<Option<LookupEntry>, ServiceError> {
        let key = LookupKey::vote(*tx_hash, node_id);
        let found = self
            .votes
            .read_entry(&self.store, &key)
            .map_err(|e| self.report("vote_location", &key.to_string(), e.into()))?;
        self.metrics.record_lookup(found.is_some());
        Ok(found)
    }

    /// The transaction with `hash` and where it lives.
    pub fn transaction(
        &self,
        hash: &Hash,
    ) -> Result<Option<LocatedItem<Transaction>>, ServiceError> {
        let key = LookupKey::transaction(*hash);
        let found = self
            .transactions
            .read_item(&self.store, &self.bodies, &key)
            .map_err(|e| self.report("transaction", &key.to_string(), e.into()))?;
        self.metrics.record_lookup(found.is_some());
        Ok(found)
    }

    /// The vote `node_id` cast on transaction `tx_hash`, and where it lives.
    pub fn vote(
        &self,
        tx_hash: &Hash,
        node_id: &str,
    ) -> Result<Option<LocatedItem<Vote>>, ServiceError> {
        let key = LookupKey::vote(*tx_hash, node_id);
        let found = self
            .votes
            .read_item(&self.store, &self.bodies, &key)
            .map_err(|e| self.report("vote", &key.to_string(), e.into()))?;
        self.metrics.record_lookup(found.is_some());
        Ok(found)
    }

    // =========================================================================
    // Existence queries
    // =========================================================================

    /// Whether `bloom` may hold `hash`. A positive must be confirmed.
    pub fn may_contain(&self, bloom: &Bloom, hash: &Hash) -> bool {
        bloom.test_hash(hash)
    }

    /// Block numbers of `section` whose bloom may hold `hash`.
    pub fn section_candidates(
        &self,
        section: u64,
        head: &Hash,
        hash: &Hash,
    ) -> Result<Vec<u64>, ServiceError> {
        Ok(self.sections.matching_blocks(&self.store, section, head, hash)?)
    }

    /// Locate `hash` using per-block blooms to skip the lookup when no block
    /// can hold it.
    ///
    /// `blooms` pairs block numbers with their blooms. The entry is returned
    /// only if it points at one of the positive blocks.
    pub fn find_transaction(
        &self,
        hash: &Hash,
        blooms: &[(u64, Bloom)],
    ) -> Result<Option<LookupEntry>, ServiceError> {
        let candidates: Vec<u64> = blooms
            .iter()
            .filter(|(_, bloom)| bloom.test_hash(hash))
            .map(|(number, _)| *number)
            .collect();
        if candidates.is_empty() {
            return Ok(None);
        }

        Ok(self
            .transaction_location(hash)?
            .filter(|entry| candidates.contains(&entry.block_number)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store, for repair tooling and tests.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn bodies(&self) -> &B {
        &self.bodies
    }

    pub fn config(&self) -> &IndexServiceConfig {
        &self.config
    }

    pub fn sections(&self) -> &SectionBloomStore {
        &self.sections
    }

    pub fn metrics(&self) -> Arc<IndexMetrics> {
        Arc::clone(&self.metrics)
    }

    /// In-section index the generator expects next, if sectioning is on.
    pub fn pending_section_index(&self) -> Option<u64> {
        self.generator.as_ref().map(SectionGenerator::next_index)
    }

    /// Section number currently being built, if any.
    pub fn pending_section(&self) -> Option<u64> {
        self.generator.as_ref().and_then(SectionGenerator::section)
    }

    fn report(&self, operation: &'static str, subject: &str, err: ServiceError) -> ServiceError {
        match err.class() {
            ErrorClass::ConsistencyViolation => {
                self.metrics.record_consistency_violation();
                error!(operation, subject, error = %err, "index consistency violation");
            }
            ErrorClass::StoreFailure => {
                error!(operation, subject, error = %err, "index store failure");
            }
            ErrorClass::NotFound | ErrorClass::InputViolation => {}
        }
        err
    }
}

/// Add `bloom` to the section under construction.
///
/// Returns the section number when this block completed and persisted it.
fn feed_section<S>(
    generator: &mut SectionGenerator,
    sections: &SectionBloomStore,
    store: &mut S,
    block: &Block,
    bloom: &Bloom,
) -> Result<Option<u64>, ServiceError>
where
    S: KeyValueStore + ?Sized,
{
    let size = generator.section_size();
    let number = block.number();
    let section = number / size;
    let offset = number % size;

    let continues = generator.section() == Some(section) && generator.next_index() == offset;
    if !continues {
        if generator.next_index() != 0 {
            warn!(
                block_number = number,
                building_section = generator.section(),
                expected_offset = generator.next_index(),
                section,
                offset,
                "bloom section broken by out-of-order block, discarding"
            );
        }
        if offset != 0 {
            generator.reset();
            debug!(block_number = number, "waiting for next bloom section boundary");
            return Ok(None);
        }
        generator.begin(section);
    }

    generator.add_bloom(offset, bloom)?;
    if !generator.is_complete() {
        return Ok(None);
    }

    let head = block.hash();
    let result = sections.write_section(store, section, &head, generator);
    generator.reset();
    result?;
    Ok(Some(section))
}

fn block_subject(block: &Block) -> String {
    format!("block #{} (0x{})", block.number(), hex::encode(block.hash()))
}
