//! Plane matching
//!
//! A value's three bloom bits select three planes of a section. A block can
//! only contain the value if its bit is set in all three.

use bitvec::prelude::*;

/// In-section offsets of blocks whose bit survives the AND of `planes`.
///
/// Planes shorter than the longest one truncate the match. No planes
/// yields no candidates.
pub fn section_candidates(planes: &[Vec<u8>]) -> Vec<u64> {
    let Some((first, rest)) = planes.split_first() else {
        return Vec::new();
    };
    let len = planes.iter().map(Vec::len).min().unwrap_or(0);

    let mut combined = first[..len].to_vec();
    for plane in rest {
        for (c, p) in combined.iter_mut().zip(plane.iter()) {
            *c &= *p;
        }
    }

    combined
        .view_bits::<Msb0>()
        .iter_ones()
        .map(|i| i as u64)
        .collect()
}
