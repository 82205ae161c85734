//! # Lookup Flows
//!
//! Hash to block-locator flows over a multi-block chain, including a
//! reorganisation that swaps out the tip.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use qc_03_lookup_index::{LookupEntry, LookupKey, TransactionLookup, VoteLookup};
    use qc_index_service::IndexServiceConfig;
    use shared_types::{keys, KeyValueStore};

    fn config() -> IndexServiceConfig {
        IndexServiceConfig::default()
            .with_index_votes(true)
            .with_sections_enabled(false)
    }

    // =========================================================================
    // COMMIT AND LOCATE
    // =========================================================================

    #[test]
    fn test_every_transaction_in_chain_is_locatable() {
        let (mut service, bodies) = memory_service(config());
        let blocks = chain(5, 4);
        for block in &blocks {
            commit(&mut service, &bodies, block);
        }

        for block in &blocks {
            for (index, tx) in block.transactions.iter().enumerate() {
                let entry = service.transaction_location(&tx.hash()).unwrap().unwrap();
                assert_eq!(
                    entry,
                    LookupEntry::new(block.hash(), block.number(), index as u64)
                );

                let located = service.transaction(&tx.hash()).unwrap().unwrap();
                assert_eq!(&located.item, tx);
            }
        }

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.blocks_indexed, 5);
        assert_eq!(snapshot.entries_written, 20);
    }

    #[test]
    fn test_unknown_hash_reads_as_absent() {
        let (mut service, bodies) = memory_service(config());
        commit(&mut service, &bodies, &chain(1, 2)[0]);

        let unknown = random_hash();
        assert!(service.transaction_location(&unknown).unwrap().is_none());
        assert!(service.transaction(&unknown).unwrap().is_none());

        let locator = TransactionLookup::new()
            .read_locator(service.store(), &LookupKey::transaction(unknown))
            .unwrap();
        assert_eq!(locator, ([0u8; 32], 0, 0));
    }

    #[test]
    fn test_entries_use_the_public_key_layout() {
        let (mut service, bodies) = memory_service(config());
        let block = block_at(3, [0xAB; 32], 1, vec![vote_on(0, "node-7")]);
        commit(&mut service, &bodies, &block);

        let tx_hash = block.transactions[0].hash();
        let raw = service
            .store()
            .get(&keys::tx_lookup_key(&tx_hash))
            .unwrap()
            .expect("entry under l + hash");
        let decoded: LookupEntry = rlp::decode(&raw).unwrap();
        assert_eq!(decoded, LookupEntry::new(block.hash(), 3, 0));

        assert!(service
            .store()
            .exists(&keys::vote_lookup_key(&tx_hash, "node-7"))
            .unwrap());
    }

    // =========================================================================
    // VOTES
    // =========================================================================

    #[test]
    fn test_votes_from_different_nodes_are_distinct() {
        let (mut service, bodies) = memory_service(config());
        let votes = vec![vote_on(0, "node-a"), vote_on(0, "node-b"), vote_on(1, "node-a")];
        let block = block_at(1, [0u8; 32], 2, votes.clone());
        commit(&mut service, &bodies, &block);

        let first = block.transactions[0].hash();
        let second = block.transactions[1].hash();

        let a = service.vote(&first, "node-a").unwrap().unwrap();
        let b = service.vote(&first, "node-b").unwrap().unwrap();
        let a_second = service.vote(&second, "node-a").unwrap().unwrap();

        assert_eq!(a.entry.index, 0);
        assert_eq!(b.entry.index, 1);
        assert_eq!(a_second.entry.index, 2);
        assert_eq!(a.item, votes[0]);
        assert_eq!(b.item, votes[1]);

        assert!(service.vote(&second, "node-b").unwrap().is_none());
    }

    #[test]
    fn test_votes_skipped_when_disabled() {
        let (mut service, bodies) = memory_service(config().with_index_votes(false));
        let block = block_at(1, [0u8; 32], 1, vec![vote_on(0, "node-a")]);
        commit(&mut service, &bodies, &block);

        let tx_hash = block.transactions[0].hash();
        assert!(service.transaction_location(&tx_hash).unwrap().is_some());
        assert!(service.vote_location(&tx_hash, "node-a").unwrap().is_none());
    }

    // =========================================================================
    // REORGANISATION
    // =========================================================================

    #[test]
    fn test_reorg_replaces_tip_entries() {
        let (mut service, bodies) = memory_service(config());
        let blocks = chain(3, 2);
        for block in &blocks {
            commit(&mut service, &bodies, block);
        }

        // Replace block 2 with a sibling that re-includes one of its transactions.
        let old_tip = &blocks[2];
        let kept = old_tip.transactions[1].clone();
        let dropped = old_tip.transactions[0].hash();

        let removed = service.unindex_block(old_tip).unwrap();
        assert_eq!(removed, 2);
        bodies.remove(&old_tip.hash(), old_tip.number());

        let mut sibling = block_at(2, blocks[1].hash(), 1, vec![]);
        sibling.header.timestamp += 1;
        sibling.transactions.push(kept.clone());
        assert_ne!(sibling.hash(), old_tip.hash());
        commit(&mut service, &bodies, &sibling);

        assert!(service.transaction_location(&dropped).unwrap().is_none());

        let moved = service.transaction(&kept.hash()).unwrap().unwrap();
        assert_eq!(moved.entry.block_hash, sibling.hash());
        assert_eq!(moved.entry.index, 1);
        assert_eq!(moved.item, kept);

        // Earlier blocks are untouched.
        let untouched = blocks[0].transactions[0].hash();
        assert_eq!(
            service.transaction_location(&untouched).unwrap().unwrap().block_hash,
            blocks[0].hash()
        );
    }

    #[test]
    fn test_reindexing_same_block_overwrites() {
        let (mut service, bodies) = memory_service(config());
        let block = chain(1, 3).remove(0);
        commit(&mut service, &bodies, &block);
        let before = service.store().len();

        service.index_block(&block).unwrap();
        assert_eq!(service.store().len(), before);
    }

    // =========================================================================
    // DIRECT INDEX USE
    // =========================================================================

    #[test]
    fn test_lookup_indexes_share_a_store_without_collisions() {
        let mut store = shared_types::InMemoryKVStore::new();
        let block = block_at(9, [0u8; 32], 2, vec![vote_on(0, "n"), vote_on(1, "n")]);

        let txs = TransactionLookup::new();
        let votes = VoteLookup::new();
        assert_eq!(txs.write_entries(&mut store, &block).unwrap(), 2);
        assert_eq!(votes.write_entries(&mut store, &block).unwrap(), 2);
        assert_eq!(store.len(), 4);

        assert_eq!(votes.delete_entries(&mut store, &block).unwrap(), 2);
        let tx_key = LookupKey::transaction(block.transactions[1].hash());
        assert_eq!(txs.read_entry(&store, &tx_key).unwrap().unwrap().index, 1);
    }
}
