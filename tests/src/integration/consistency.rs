//! # Consistency Flows
//!
//! Entries that point at data the chain does not hold. Each case must
//! surface as a consistency violation and be counted.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_03_lookup_index::{IndexingError, LookupEntry};
    use qc_index_service::{IndexServiceConfig, ServiceError};
    use shared_types::{keys, ErrorClass, KeyValueStore};

    fn config() -> IndexServiceConfig {
        IndexServiceConfig::default()
            .with_index_votes(true)
            .with_sections_enabled(false)
    }

    #[test]
    fn test_corrupt_entry_is_violation() {
        let (mut service, bodies) = memory_service(config());
        let block = chain(1, 1).remove(0);
        commit(&mut service, &bodies, &block);

        let tx_hash = block.transactions[0].hash();
        service
            .store_mut()
            .put(&keys::tx_lookup_key(&tx_hash), &[0xC1, 0xFF])
            .unwrap();

        let err = service.transaction_location(&tx_hash).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Indexing(IndexingError::EntryDecode { .. })
        ));
        assert!(err.is_consistency_violation());
        assert_eq!(service.metrics().snapshot().consistency_violations, 1);
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let (mut service, _bodies) = memory_service(config());
        let hash = random_hash();
        service
            .store_mut()
            .put(&keys::tx_lookup_key(&hash), &[])
            .unwrap();

        assert!(service.transaction_location(&hash).unwrap().is_none());
        assert_eq!(service.metrics().snapshot().consistency_violations, 0);
    }

    #[test]
    fn test_missing_body_is_violation() {
        let (mut service, bodies) = memory_service(config());
        let block = chain(1, 2).remove(0);
        commit(&mut service, &bodies, &block);
        bodies.remove(&block.hash(), block.number());

        let tx_hash = block.transactions[1].hash();
        // The entry itself is still readable.
        assert!(service.transaction_location(&tx_hash).unwrap().is_some());

        let err = service.transaction(&tx_hash).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Indexing(IndexingError::MissingBody { block_number: 0, .. })
        ));
        assert_eq!(err.class(), ErrorClass::ConsistencyViolation);
    }

    #[test]
    fn test_index_past_body_end_is_violation() {
        let (mut service, bodies) = memory_service(config());
        let block = chain(1, 2).remove(0);
        commit(&mut service, &bodies, &block);

        let stray = random_hash();
        let entry = LookupEntry::new(block.hash(), block.number(), 9);
        service
            .store_mut()
            .put(&keys::tx_lookup_key(&stray), &rlp::encode(&entry))
            .unwrap();

        let err = service.transaction(&stray).unwrap_err();
        match err {
            ServiceError::Indexing(IndexingError::ItemOutOfBounds { index, len, .. }) => {
                assert_eq!(index, 9);
                assert_eq!(len, 2);
            }
            other => panic!("expected out-of-bounds violation, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_vote_writes_nothing() {
        let (mut service, bodies) = memory_service(config());
        let block = block_at(4, [0u8; 32], 1, vec![vote_on(3, "node-x")]);
        bodies.insert_block(&block);

        let err = service.index_block(&block).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Indexing(IndexingError::DanglingVoteReference { tx_index: 3, .. })
        ));
        assert!(service.store().is_empty());
        assert_eq!(service.metrics().snapshot().blocks_indexed, 0);
    }

    #[test]
    fn test_config_from_json_drives_service() {
        let config = IndexServiceConfig::from_json(
            r#"{ "index_votes": false, "sections": { "enabled": true, "section_size": 16 } }"#,
        )
        .unwrap();
        let (service, _bodies) = memory_service(config);
        assert!(!service.config().index_votes);
        assert_eq!(service.sections().section_size(), 16);

        assert!(IndexServiceConfig::from_json(r#"{ "sections": { "section_size": 12 } }"#).is_err());
    }
}
