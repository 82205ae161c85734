//! # Index Benchmarks
//!
//! Hot paths of block commit and lookup.
//!
//! ```bash
//! cargo bench -p qc-tests
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qc_03_lookup_index::{LookupEntry, LookupEntryCodec, LookupKey, RlpEntryCodec, TransactionLookup};
use qc_07_bloom_index::{Bloom, SectionGenerator};
use qc_index_service::IndexServiceConfig;
use qc_tests::fixtures::{chain, commit, memory_service, random_hash};
use shared_types::{Hash, InMemoryKVStore};

fn bench_bloom(c: &mut Criterion) {
    let mut group = c.benchmark_group("bloom");

    for count in [1usize, 16, 256] {
        let hashes: Vec<Hash> = (0..count).map(|_| random_hash()).collect();
        group.bench_with_input(BenchmarkId::new("from_hashes", count), &hashes, |b, hashes| {
            b.iter(|| Bloom::from_hashes(black_box(hashes)))
        });
    }

    let bloom = Bloom::from_hashes(&(0..64).map(|_| random_hash()).collect::<Vec<_>>());
    let probe = random_hash();
    group.bench_function("test_hash", |b| b.iter(|| bloom.test_hash(black_box(&probe))));

    group.bench_function("section_4096", |b| {
        let blooms: Vec<Bloom> = (0..4096).map(|_| Bloom::from_hash(&random_hash())).collect();
        b.iter(|| {
            let mut generator = SectionGenerator::new(4096).expect("valid size");
            for (index, bloom) in blooms.iter().enumerate() {
                generator.add_bloom(index as u64, bloom).expect("in order");
            }
            black_box(generator.bitset(0).expect("complete"))
        })
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    let entry = LookupEntry::new(random_hash(), 1_234_567, 42);
    let codec = RlpEntryCodec;
    group.bench_function("rlp_encode", |b| b.iter(|| codec.encode(black_box(&entry))));
    let encoded = codec.encode(&entry).expect("encodes");
    group.bench_function("rlp_decode", |b| b.iter(|| codec.decode(black_box(&encoded))));

    let blocks = chain(1, 200);
    group.bench_function("write_entries_200", |b| {
        let index = TransactionLookup::new();
        b.iter(|| {
            let mut store = InMemoryKVStore::new();
            index.write_entries(&mut store, &blocks[0]).expect("writes")
        })
    });

    let (mut service, bodies) = memory_service(IndexServiceConfig::default());
    for block in &chain(32, 50) {
        commit(&mut service, &bodies, block);
    }
    let mut store = InMemoryKVStore::new();
    let index = TransactionLookup::new();
    index.write_entries(&mut store, &blocks[0]).expect("writes");
    let key = LookupKey::transaction(blocks[0].transactions[100].hash());
    group.bench_function("read_entry", |b| {
        b.iter(|| index.read_entry(&store, black_box(&key)).expect("reads"))
    });

    let absent = blocks[0].transactions[7].hash();
    group.bench_function("service_transaction_location_miss", |b| {
        b.iter(|| service.transaction_location(black_box(&absent)).expect("reads"))
    });

    group.finish();
}

criterion_group!(benches, bench_bloom, bench_lookup);
criterion_main!(benches);
