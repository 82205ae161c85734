//! # QC-07 Bloom Index
//!
//! Probabilistic "might this block contain X?" answers for the chain.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure logic, no I/O
//!   - `Bloom`: fixed 2048-bit filter, one per block
//!   - `hash_functions`: the 3-bit derivation of a value
//!   - `SectionGenerator`: transposes N block blooms into 2048 bit planes
//!   - `matcher`: ANDs bit planes into candidate blocks
//!
//! - **Service Layer** (`service/`): persistence
//!   - `SectionBloomStore`: bit planes keyed by (bit, section, head)
//!
//! ## Invariants
//!
//! - **No false negatives**: after `add(v)`, `test(v)` is true, and every
//!   block whose bloom holds `v` survives the plane match.
//! - **Fixed width**: a bloom is always exactly 256 bytes.
//!
//! ## Precision
//!
//! Only the first 6 bytes of a value feed the filter (k = 3). This matches
//! the filters already persisted by deployed nodes and must not change.

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{
    bloom_bit_positions, bloom_bits, hash_bit_positions, hash_bits, merge, section_candidates,
    Bloom, SectionGenerator, BLOOM_BIT_LENGTH, BLOOM_BYTE_LENGTH, BLOOM_VALUE_MIN_LEN,
    MAX_SECTION_SIZE,
};
pub use error::{BloomError, GeneratorError, PlaneStoreError};
pub use service::SectionBloomStore;
