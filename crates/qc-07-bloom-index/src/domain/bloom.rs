//! Fixed-width block bloom filter
//!
//! A [`Bloom`] is 2048 bits stored as 256 big-endian bytes: bit `p` of the
//! big-integer view lives in byte `255 - p / 8` under mask `1 << (p % 8)`.
//! In `Msb0` order over the byte array that is index `2047 - p`.
//!
//! INVARIANTS:
//! - No false negatives: after `add(v)`, `test(v)` is true
//! - `add` only ever sets bits

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};
use std::str::FromStr;

use bitvec::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use shared_types::Hash;

use super::hash_functions::{bloom_bits, hash_bits};
use crate::error::BloomError;

/// Size of a bloom in bytes.
pub const BLOOM_BYTE_LENGTH: usize = 256;

/// Size of a bloom in bits.
pub const BLOOM_BIT_LENGTH: usize = 8 * BLOOM_BYTE_LENGTH;

/// 2048-bit bloom filter.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bloom([u8; BLOOM_BYTE_LENGTH]);

impl Default for Bloom {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bloom {
    /// The bloom with no bits set.
    pub const EMPTY: Bloom = Bloom([0u8; BLOOM_BYTE_LENGTH]);

    /// Build a bloom from its byte form.
    ///
    /// Shorter input is right-aligned (left-padded with zeros).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BloomError> {
        let mut bloom = Self::EMPTY;
        bloom.set_bytes(bytes)?;
        Ok(bloom)
    }

    /// Overwrite the trailing `bytes.len()` bytes of the filter.
    ///
    /// Leading bytes are left untouched.
    pub fn set_bytes(&mut self, bytes: &[u8]) -> Result<(), BloomError> {
        if bytes.len() > BLOOM_BYTE_LENGTH {
            return Err(BloomError::BytesTooLong {
                len: bytes.len(),
                max: BLOOM_BYTE_LENGTH,
            });
        }
        self.0[BLOOM_BYTE_LENGTH - bytes.len()..].copy_from_slice(bytes);
        Ok(())
    }

    /// Bloom holding a single hash.
    pub fn from_hash(hash: &Hash) -> Self {
        hash_bits(hash)
    }

    /// Bloom holding every hash in `hashes`.
    pub fn from_hashes<'a, I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = &'a Hash>,
    {
        let mut bloom = Self::EMPTY;
        for hash in hashes {
            bloom.add_hash(hash);
        }
        bloom
    }

    /// Bloom with exactly the given bit positions set. Positions are < 2048.
    pub(crate) fn from_positions(positions: impl IntoIterator<Item = usize>) -> Self {
        let mut bloom = Self::EMPTY;
        let bits = bloom.0.view_bits_mut::<Msb0>();
        for p in positions {
            bits.set(BLOOM_BIT_LENGTH - 1 - p, true);
        }
        bloom
    }

    pub fn add(&mut self, value: &[u8]) -> Result<(), BloomError> {
        let pattern = bloom_bits(value)?;
        self.add_pattern(&pattern);
        Ok(())
    }

    pub fn add_hash(&mut self, hash: &Hash) {
        self.add_pattern(&hash_bits(hash));
    }

    /// OR an already derived pattern into the filter.
    pub fn add_pattern(&mut self, pattern: &Bloom) {
        *self |= *pattern;
    }

    /// Whether `value` may have been added.
    pub fn test(&self, value: &[u8]) -> Result<bool, BloomError> {
        Ok(self.test_pattern(&bloom_bits(value)?))
    }

    pub fn test_hash(&self, hash: &Hash) -> bool {
        self.test_pattern(&hash_bits(hash))
    }

    /// True if every bit of `pattern` is set here.
    pub fn test_pattern(&self, pattern: &Bloom) -> bool {
        (*self & *pattern) == *pattern
    }

    /// Whether bit `p` of the big-integer view is set.
    pub fn is_set(&self, p: usize) -> bool {
        p < BLOOM_BIT_LENGTH && self.0.view_bits::<Msb0>()[BLOOM_BIT_LENGTH - 1 - p]
    }

    /// Set bit positions, highest first.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .view_bits::<Msb0>()
            .iter_ones()
            .map(|i| BLOOM_BIT_LENGTH - 1 - i)
    }

    pub fn bits_set(&self) -> usize {
        self.0.view_bits::<Msb0>().count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; BLOOM_BYTE_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// Intersection of `blooms`.
///
/// The result tests positive only for patterns present in every input.
pub fn merge(blooms: &[Bloom]) -> Result<Bloom, BloomError> {
    let (first, rest) = blooms.split_first().ok_or(BloomError::EmptyMerge)?;
    Ok(rest.iter().fold(*first, |acc, b| acc & *b))
}

impl BitOr for Bloom {
    type Output = Bloom;

    fn bitor(mut self, rhs: Bloom) -> Bloom {
        self |= rhs;
        self
    }
}

impl BitOrAssign for Bloom {
    fn bitor_assign(&mut self, rhs: Bloom) {
        for (s, o) in self.0.iter_mut().zip(rhs.0.iter()) {
            *s |= *o;
        }
    }
}

impl BitAnd for Bloom {
    type Output = Bloom;

    fn bitand(mut self, rhs: Bloom) -> Bloom {
        self &= rhs;
        self
    }
}

impl BitAndAssign for Bloom {
    fn bitand_assign(&mut self, rhs: Bloom) {
        for (s, o) in self.0.iter_mut().zip(rhs.0.iter()) {
            *s &= *o;
        }
    }
}

impl fmt::Display for Bloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Bloom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bloom")
            .field("bits_set", &self.bits_set())
            .finish()
    }
}

impl FromStr for Bloom {
    type Err = BloomError;

    /// Parse `0x`-prefixed hex of exactly 256 bytes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| BloomError::InvalidHex("missing 0x prefix".to_string()))?;
        let bytes = hex::decode(digits).map_err(|e| BloomError::InvalidHex(e.to_string()))?;
        let array: [u8; BLOOM_BYTE_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            BloomError::InvalidHex(format!(
                "expected {BLOOM_BYTE_LENGTH} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Bloom(array))
    }
}

impl Serialize for Bloom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bloom {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
