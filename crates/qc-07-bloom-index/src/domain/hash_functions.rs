//! Bit derivation for the block bloom
//!
//! A value sets three bits. Each bit is taken from one big-endian byte pair
//! of the value's prefix, masked to 11 bits:
//!
//! ```text
//! p0 = ((v[0] << 8) | v[1]) & 2047
//! p1 = ((v[2] << 8) | v[3]) & 2047
//! p2 = ((v[4] << 8) | v[5]) & 2047
//! ```
//!
//! Bytes past the sixth never influence the result.

use shared_types::Hash;

use super::bloom::{Bloom, BLOOM_BIT_LENGTH};
use crate::error::BloomError;

/// Minimum value length accepted by the derivation.
pub const BLOOM_VALUE_MIN_LEN: usize = 6;

/// The three bit positions `value` sets.
pub fn bloom_bit_positions(value: &[u8]) -> Result<[usize; 3], BloomError> {
    if value.len() < BLOOM_VALUE_MIN_LEN {
        return Err(BloomError::ValueTooShort {
            len: value.len(),
            min: BLOOM_VALUE_MIN_LEN,
        });
    }
    Ok(derive(value))
}

/// Bit positions of a 32-byte hash. Never fails.
pub fn hash_bit_positions(hash: &Hash) -> [usize; 3] {
    derive(hash)
}

// `value` holds at least BLOOM_VALUE_MIN_LEN bytes.
fn derive(value: &[u8]) -> [usize; 3] {
    let pair = |i: usize| (((value[i] as usize) << 8) | value[i + 1] as usize) & (BLOOM_BIT_LENGTH - 1);
    [pair(0), pair(2), pair(4)]
}

/// The pattern `value` sets, as a bloom of its own.
pub fn bloom_bits(value: &[u8]) -> Result<Bloom, BloomError> {
    bloom_bit_positions(value).map(Bloom::from_positions)
}

pub fn hash_bits(hash: &Hash) -> Bloom {
    Bloom::from_positions(hash_bit_positions(hash))
}
