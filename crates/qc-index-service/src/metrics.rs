//! Counters for index operations

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Thread-safe index counters
#[derive(Debug, Default)]
pub struct IndexMetrics {
    /// Blocks passed through `index_block`
    pub blocks_indexed: AtomicU64,
    /// Blocks passed through `unindex_block`
    pub blocks_unindexed: AtomicU64,
    /// Lookup entries written
    pub entries_written: AtomicU64,
    /// Lookup entries deleted
    pub entries_deleted: AtomicU64,
    /// By-hash lookups served
    pub lookups: AtomicU64,
    /// Lookups that found an entry
    pub lookup_hits: AtomicU64,
    /// Consistency violations surfaced
    pub consistency_violations: AtomicU64,
    /// Bloom sections persisted
    pub sections_written: AtomicU64,
}

impl IndexMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_block_indexed(&self, entries: usize) {
        self.blocks_indexed.fetch_add(1, Ordering::Relaxed);
        self.entries_written
            .fetch_add(entries as u64, Ordering::Relaxed);
    }

    pub fn record_block_unindexed(&self, entries: usize) {
        self.blocks_unindexed.fetch_add(1, Ordering::Relaxed);
        self.entries_deleted
            .fetch_add(entries as u64, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if found {
            self.lookup_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_consistency_violation(&self) {
        self.consistency_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_section_written(&self) {
        self.sections_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            blocks_indexed: self.blocks_indexed.load(Ordering::Relaxed),
            blocks_unindexed: self.blocks_unindexed.load(Ordering::Relaxed),
            entries_written: self.entries_written.load(Ordering::Relaxed),
            entries_deleted: self.entries_deleted.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_hits: self.lookup_hits.load(Ordering::Relaxed),
            consistency_violations: self.consistency_violations.load(Ordering::Relaxed),
            sections_written: self.sections_written.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub blocks_indexed: u64,
    pub blocks_unindexed: u64,
    pub entries_written: u64,
    pub entries_deleted: u64,
    pub lookups: u64,
    pub lookup_hits: u64,
    pub consistency_violations: u64,
    pub sections_written: u64,
}
