//! Bit-plane persistence
//!
//! One record per (bit, section, head). `head` is the hash of the last block
//! of the section, so planes written for a section that was later reorged
//! away are never read for the canonical one.

use shared_types::keys::bloom_bits_key;
use shared_types::{Hash, KeyValueStore};
use tracing::debug;

use crate::domain::generator::validate_section_size;
use crate::domain::{hash_bit_positions, section_candidates, SectionGenerator, BLOOM_BIT_LENGTH};
use crate::error::{GeneratorError, PlaneStoreError};

/// Stores the bit planes of completed sections.
#[derive(Debug, Clone, Copy)]
pub struct SectionBloomStore {
    section_size: u64,
}

impl SectionBloomStore {
    pub fn new(section_size: u64) -> Result<Self, GeneratorError> {
        validate_section_size(section_size)?;
        Ok(Self { section_size })
    }

    /// Blocks per section.
    pub fn section_size(&self) -> u64 {
        self.section_size
    }

    /// Bytes per bit plane.
    pub fn plane_len(&self) -> usize {
        (self.section_size / 8) as usize
    }

    /// First block number of `section`.
    pub fn section_start(&self, section: u64) -> Result<u64, PlaneStoreError> {
        section
            .checked_mul(self.section_size)
            .ok_or(PlaneStoreError::SectionOutOfRange { section })
    }

    /// Store one plane as given. The payload is opaque here, so planes that
    /// were compressed upstream pass through unchanged.
    pub fn write_plane<S>(
        &self,
        store: &mut S,
        bit: usize,
        section: u64,
        head: &Hash,
        plane: &[u8],
    ) -> Result<(), PlaneStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let key = plane_key(bit, section, head)?;
        store
            .put(&key, plane)
            .map_err(|source| PlaneStoreError::Store {
                operation: "put",
                bit,
                section,
                source,
            })
    }

    pub fn read_plane<S>(
        &self,
        store: &S,
        bit: usize,
        section: u64,
        head: &Hash,
    ) -> Result<Vec<u8>, PlaneStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let key = plane_key(bit, section, head)?;
        store
            .get(&key)
            .map_err(|source| PlaneStoreError::Store {
                operation: "get",
                bit,
                section,
                source,
            })?
            .ok_or(PlaneStoreError::NotFound {
                bit,
                section,
                head: *head,
            })
    }

    /// Write all planes of a completed section.
    ///
    /// A generator bound to a section number may only be written under
    /// that number.
    pub fn write_section<S>(
        &self,
        store: &mut S,
        section: u64,
        head: &Hash,
        generator: &SectionGenerator,
    ) -> Result<(), PlaneStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        if generator.section_size() != self.section_size {
            return Err(PlaneStoreError::InvalidPlaneLength {
                len: (generator.section_size() / 8) as usize,
                expected: self.plane_len(),
            });
        }
        if let Some(building) = generator.section() {
            if building != section {
                return Err(GeneratorError::SectionMismatch {
                    building,
                    requested: section,
                }
                .into());
            }
        }
        self.section_start(section)?;

        for bit in 0..BLOOM_BIT_LENGTH {
            let plane = generator.bitset(bit)?;
            if plane.len() != self.plane_len() {
                return Err(PlaneStoreError::InvalidPlaneLength {
                    len: plane.len(),
                    expected: self.plane_len(),
                });
            }
            self.write_plane(store, bit, section, head, &plane)?;
        }

        debug!(
            section,
            head = %hex::encode(head),
            planes = BLOOM_BIT_LENGTH,
            "bloom section written"
        );
        Ok(())
    }

    /// The three planes selected by `hash`'s bloom bits.
    pub fn read_candidate_planes<S>(
        &self,
        store: &S,
        section: u64,
        head: &Hash,
        hash: &Hash,
    ) -> Result<Vec<Vec<u8>>, PlaneStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        hash_bit_positions(hash)
            .into_iter()
            .map(|bit| self.read_plane(store, bit, section, head))
            .collect()
    }

    /// Block numbers in `section` whose bloom may contain `hash`.
    pub fn matching_blocks<S>(
        &self,
        store: &S,
        section: u64,
        head: &Hash,
        hash: &Hash,
    ) -> Result<Vec<u64>, PlaneStoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let start = self.section_start(section)?;
        let planes = self.read_candidate_planes(store, section, head, hash)?;
        section_candidates(&planes)
            .into_iter()
            .map(|offset| {
                start
                    .checked_add(offset)
                    .ok_or(PlaneStoreError::SectionOutOfRange { section })
            })
            .collect()
    }
}

fn plane_key(bit: usize, section: u64, head: &Hash) -> Result<Vec<u8>, PlaneStoreError> {
    if bit >= BLOOM_BIT_LENGTH {
        return Err(PlaneStoreError::InvalidBit {
            bit,
            max: BLOOM_BIT_LENGTH,
        });
    }
    Ok(bloom_bits_key(bit as u16, section, head))
}
