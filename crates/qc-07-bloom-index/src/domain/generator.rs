//! Bit-plane assembly
//!
//! Collects the blooms of one section of N consecutive blocks and
//! transposes them into 2048 bit planes. Plane `b` has one bit per block:
//! bit `i` (MSB-first within each byte) is set when block `i` of the section
//! has bloom bit `b` set.
//!
//! A generator is bound to one section number at a time, so blooms of
//! different sections never share a set of planes.

use bitvec::prelude::*;

use super::bloom::{Bloom, BLOOM_BIT_LENGTH};
use crate::error::GeneratorError;

/// Largest accepted section. Planes are held in memory while a section is
/// built: 2048 planes of `size / 8` bytes, 64 MiB at this bound.
pub const MAX_SECTION_SIZE: u64 = 1 << 18;

/// Reject section sizes that are zero, not a multiple of 8, or above
/// [`MAX_SECTION_SIZE`].
pub fn validate_section_size(size: u64) -> Result<(), GeneratorError> {
    if size == 0 || size % 8 != 0 || size > MAX_SECTION_SIZE {
        return Err(GeneratorError::InvalidSectionSize { size });
    }
    Ok(())
}

/// Accumulates one section of blooms.
#[derive(Debug, Clone)]
pub struct SectionGenerator {
    section_size: u64,
    section: Option<u64>,
    next_index: u64,
    planes: Vec<BitVec<u8, Msb0>>,
}

impl SectionGenerator {
    pub fn new(section_size: u64) -> Result<Self, GeneratorError> {
        validate_section_size(section_size)?;
        Ok(Self {
            section_size,
            section: None,
            next_index: 0,
            planes: vec![bitvec![u8, Msb0; 0; section_size as usize]; BLOOM_BIT_LENGTH],
        })
    }

    pub fn section_size(&self) -> u64 {
        self.section_size
    }

    /// Section number being built, once [`begin`](Self::begin) was called.
    pub fn section(&self) -> Option<u64> {
        self.section
    }

    /// Drop anything accumulated and start building `section`.
    pub fn begin(&mut self, section: u64) {
        self.reset();
        self.section = Some(section);
    }

    /// In-section index the next bloom must carry.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn is_complete(&self) -> bool {
        self.next_index == self.section_size
    }

    /// Add the bloom of block `index` of the section.
    ///
    /// Blooms must arrive in order starting at 0.
    pub fn add_bloom(&mut self, index: u64, bloom: &Bloom) -> Result<(), GeneratorError> {
        if self.is_complete() {
            return Err(GeneratorError::SectionFull {
                size: self.section_size,
            });
        }
        if index != self.next_index {
            return Err(GeneratorError::OutOfOrder {
                expected: self.next_index,
                got: index,
            });
        }

        let offset = index as usize;
        for bit in bloom.positions() {
            self.planes[bit].set(offset, true);
        }
        self.next_index += 1;
        Ok(())
    }

    /// Plane `bit` of the completed section, `section_size / 8` bytes.
    pub fn bitset(&self, bit: usize) -> Result<Vec<u8>, GeneratorError> {
        if bit >= BLOOM_BIT_LENGTH {
            return Err(GeneratorError::InvalidBit {
                bit,
                max: BLOOM_BIT_LENGTH,
            });
        }
        if !self.is_complete() {
            return Err(GeneratorError::Incomplete {
                filled: self.next_index,
                size: self.section_size,
            });
        }
        Ok(self.planes[bit].as_raw_slice().to_vec())
    }

    /// Drop all accumulated blooms and unbind the section number.
    pub fn reset(&mut self) {
        if self.next_index > 0 {
            for plane in &mut self.planes {
                plane.fill(false);
            }
        }
        self.section = None;
        self.next_index = 0;
    }
}
