//! # Bloom Section Flows
//!
//! Per-block blooms returned by commit, folded into sections of bit
//! planes and queried back by hash.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_07_bloom_index::{
        hash_bit_positions, merge, Bloom, PlaneStoreError, SectionBloomStore, SectionGenerator,
    };
    use qc_index_service::{IndexServiceConfig, ServiceError};
    use shared_types::{keys, ErrorClass, KeyValueStore};

    const SECTION: u64 = 8;

    fn sectioned() -> IndexServiceConfig {
        IndexServiceConfig::default()
            .with_sections_enabled(true)
            .with_section_size(SECTION)
    }

    // =========================================================================
    // PER-BLOCK BLOOMS
    // =========================================================================

    #[test]
    fn test_commit_bloom_holds_block_transactions() {
        let (mut service, bodies) = memory_service(sectioned());
        let block = chain(1, 5).remove(0);
        bodies.insert_block(&block);
        let bloom = service.index_block(&block).unwrap();

        for tx in &block.transactions {
            assert!(service.may_contain(&bloom, &tx.hash()));
        }
        assert!(bloom.bits_set() <= 15);
    }

    #[test]
    fn test_find_transaction_only_in_positive_blocks() {
        let (mut service, bodies) = memory_service(sectioned());
        let blocks = chain(4, 3);
        let mut blooms = Vec::new();
        for block in &blocks {
            bodies.insert_block(block);
            blooms.push((block.number(), service.index_block(block).unwrap()));
        }

        let target = blocks[2].transactions[1].hash();
        let entry = service.find_transaction(&target, &blooms).unwrap().unwrap();
        assert_eq!(entry.block_number, 2);
        assert_eq!(entry.index, 1);

        // Blooms that exclude block 2 never yield its entry.
        let others: Vec<(u64, Bloom)> = blooms
            .iter()
            .filter(|(number, _)| *number != 2)
            .copied()
            .collect();
        assert!(service.find_transaction(&target, &others).unwrap().is_none());
        assert!(service.find_transaction(&target, &[]).unwrap().is_none());
    }

    #[test]
    fn test_merged_bloom_keeps_common_bits() {
        let shared = [0x5A; 32];
        let mut a = Bloom::from_hash(&shared);
        a.add_hash(&random_hash());
        let mut b = Bloom::from_hash(&shared);
        b.add_hash(&random_hash());

        let common = merge(&[a, b]).unwrap();
        assert!(common.test_hash(&shared));
    }

    // =========================================================================
    // SECTIONS
    // =========================================================================

    #[test]
    fn test_completed_sections_are_queryable() {
        let (mut service, bodies) = memory_service(sectioned());
        let blocks = chain(2 * SECTION, 2);
        for block in &blocks {
            commit(&mut service, &bodies, block);
        }
        assert_eq!(service.metrics().snapshot().sections_written, 2);
        assert_eq!(service.pending_section_index(), Some(0));

        let head0 = blocks[7].hash();
        let head1 = blocks[15].hash();

        let in_first = blocks[3].transactions[0].hash();
        let candidates = service.section_candidates(0, &head0, &in_first).unwrap();
        assert!(candidates.contains(&3));
        assert!(candidates.iter().all(|n| *n < SECTION));

        let in_second = blocks[12].transactions[1].hash();
        let candidates = service.section_candidates(1, &head1, &in_second).unwrap();
        assert!(candidates.contains(&12));
        assert!(candidates.iter().all(|n| (SECTION..2 * SECTION).contains(n)));
    }

    #[test]
    fn test_section_planes_stored_under_bloom_bits_keys() {
        let (mut service, bodies) = memory_service(sectioned());
        let blocks = chain(SECTION, 1);
        for block in &blocks {
            commit(&mut service, &bodies, block);
        }

        let head = blocks[7].hash();
        let tx_hash = blocks[5].transactions[0].hash();
        for bit in hash_bit_positions(&tx_hash) {
            let raw = service
                .store()
                .get(&keys::bloom_bits_key(bit as u16, 0, &head))
                .unwrap()
                .expect("plane persisted");
            assert_eq!(raw.len(), 1);
            // Block 5 sits at bit 5 of the plane, counted from the most significant end.
            assert_ne!(raw[0] & (1 << (7 - 5)), 0);
        }
    }

    #[test]
    fn test_section_under_wrong_head_is_not_found() {
        let (mut service, bodies) = memory_service(sectioned());
        for block in &chain(SECTION, 1) {
            commit(&mut service, &bodies, block);
        }

        let err = service
            .section_candidates(0, &random_hash(), &random_hash())
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::PlaneStore(PlaneStoreError::NotFound { section: 0, .. })
        ));
        assert_eq!(err.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_gap_discards_partial_section() {
        let (mut service, bodies) = memory_service(sectioned());
        let blocks = chain(3 * SECTION, 1);

        // Skip block 4: section 0 cannot complete, section 1 is built normally.
        for block in blocks.iter().filter(|b| b.number() != 4) {
            commit(&mut service, &bodies, block);
        }

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.sections_written, 2);
        assert!(service
            .section_candidates(0, &blocks[7].hash(), &blocks[1].transactions[0].hash())
            .is_err());

        let hash = blocks[9].transactions[0].hash();
        assert!(service
            .section_candidates(1, &blocks[15].hash(), &hash)
            .unwrap()
            .contains(&9));

        // Lookup entries are unaffected by the gap.
        assert!(service.transaction_location(&hash).unwrap().is_some());
    }

    #[test]
    fn test_section_sized_gap_never_mixes_sections() {
        let (mut service, bodies) = memory_service(sectioned());
        let blocks = chain(3 * SECTION, 1);

        // Blocks 0..5, then 13..24: block 13 has the offset section 0 expects next.
        for block in blocks
            .iter()
            .filter(|b| b.number() < 5 || b.number() >= 13)
        {
            commit(&mut service, &bodies, block);
        }

        assert_eq!(service.metrics().snapshot().sections_written, 1);
        for early in &blocks[0..5] {
            let hash = early.transactions[0].hash();
            assert!(service
                .section_candidates(1, &blocks[15].hash(), &hash)
                .is_err());
        }

        let hash = blocks[20].transactions[0].hash();
        let candidates = service
            .section_candidates(2, &blocks[23].hash(), &hash)
            .unwrap();
        assert!(candidates.contains(&20));
        assert!(candidates.iter().all(|n| (2 * SECTION..3 * SECTION).contains(n)));
    }

    #[test]
    fn test_section_store_standalone_round_trip() {
        let mut store = shared_types::InMemoryKVStore::new();
        let sections = SectionBloomStore::new(SECTION).unwrap();
        let mut generator = SectionGenerator::new(SECTION).unwrap();

        let target = [0x33; 32];
        for index in 0..SECTION {
            let bloom = if index == 6 {
                Bloom::from_hash(&target)
            } else {
                Bloom::EMPTY
            };
            generator.add_bloom(index, &bloom).unwrap();
        }

        let head = [0x44; 32];
        sections.write_section(&mut store, 3, &head, &generator).unwrap();
        assert_eq!(store.len(), qc_07_bloom_index::BLOOM_BIT_LENGTH);

        let matches = sections.matching_blocks(&store, 3, &head, &target).unwrap();
        assert_eq!(matches, vec![3 * SECTION + 6]);
    }
}
