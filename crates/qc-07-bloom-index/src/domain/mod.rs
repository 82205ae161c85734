//! Domain layer for the bloom index
//!
//! Pure logic with no I/O dependencies.

pub mod bloom;
pub mod generator;
pub mod hash_functions;
pub mod matcher;

pub use bloom::{merge, Bloom, BLOOM_BIT_LENGTH, BLOOM_BYTE_LENGTH};
pub use generator::{SectionGenerator, MAX_SECTION_SIZE};
pub use hash_functions::{
    bloom_bit_positions, bloom_bits, hash_bit_positions, hash_bits, BLOOM_VALUE_MIN_LEN,
};
pub use matcher::section_candidates;
