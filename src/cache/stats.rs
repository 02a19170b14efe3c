//! Cache Statistics Module
//!
//! Counts operations served by the in-process backend.

// == Cache Stats ==
/// Operation counters for [`super::MemoryCache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of set-with-expiry calls
    pub sets: u64,
    /// Number of reads that found a live value
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of delete calls, whether or not the key existed
    pub deletes: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expired: u64,
    /// Current number of stored entries
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total backend round trips observed.
    pub fn round_trips(&self) -> u64 {
        self.sets + self.hits + self.misses + self.deletes
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
