//! # Lookup Index (qc-03)
//!
//! Maps the hash of a committed item to the block that holds it:
//!
//! ```text
//! tx_hash             ──→ (block_hash, block_number, tx_index)
//! (tx_hash, node_id)  ──→ (block_hash, block_number, vote_index)
//! ```
//!
//! One generic [`LookupIndex`] serves both kinds; the kind decides the key
//! namespace and which body collection an entry points into.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Entry immutable once written | only `write_entries`/`delete_entries` touch the namespace |
//! | Entry points at a real item | `read_item` reports a `ConsistencyViolation` otherwise |
//! | Not found is not an error | reads return `Ok(None)` |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): entries, keys, entity kinds, errors
//! - **Ports Layer** (`ports/`): codec and block-body traits
//! - **Adapters Layer** (`adapters/`): RLP and bincode codecs, in-memory bodies
//! - **Service Layer** (`service/`): the index itself

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{BincodeEntryCodec, MemoryBodyProvider, RlpEntryCodec};
pub use domain::{
    IndexedEntity, IndexingError, LocatedItem, LookupEntry, LookupKey, TransactionEntity,
    VoteEntity,
};
pub use ports::{BlockBodyProvider, CodecError, LookupEntryCodec};
pub use service::{LookupIndex, TransactionLookup, VoteLookup};
