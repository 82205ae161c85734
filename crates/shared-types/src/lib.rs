//! # Shared Types Crate
//!
//! Types shared by the lookup index, the bloom index and the index service.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: block, transaction and vote entities, the
//!   store port and the key layout are defined once, here.
//! - **Stable Key Layout**: every persisted key is derived in [`keys`]; the
//!   byte layout must not change without a migration.
//! - **Store Agnostic**: indexes talk to storage only through
//!   [`KeyValueStore`].

pub mod entities;
pub mod errors;
pub mod keys;
pub mod storage;

pub use entities::*;
pub use errors::*;
pub use keys::{EntityKind, KeyPrefix};
pub use storage::{InMemoryKVStore, KeyValueStore, ScanResult};
