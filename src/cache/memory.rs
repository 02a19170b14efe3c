//! In-Process Cache Backend
//!
//! HashMap storage with per-entry TTL, implementing the same contract as the
//! shared Redis backend. Expired entries are dropped when read and by the
//! periodic sweep in [`crate::tasks`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheClient, CacheEntry, CacheStats};
use crate::error::CacheError;

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

// == Memory Cache ==
/// Cloneable handle to an in-process TTL map.
///
/// Clones share the same storage, so one handle can be given to the session
/// store and another to the sweep task.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryCache {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Stats ==
    /// Returns a snapshot of the operation counters.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - state.entries.len();
        let remaining = state.entries.len();
        state.stats.record_expired(removed);
        state.stats.set_total_entries(remaining);
        removed
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));

        let count = state.entries.len();
        state.stats.record_set();
        state.stats.set_total_entries(count);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: an expired entry is removed on the read path
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let expired = match state.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                let value = entry.value.clone();
                state.stats.record_hit();
                return Ok(Some(value));
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            state.entries.remove(key);
            let count = state.entries.len();
            state.stats.record_expired(1);
            state.stats.set_total_entries(count);
        }
        state.stats.record_miss();
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.entries.remove(key);

        let count = state.entries.len();
        state.stats.record_delete();
        state.stats.set_total_entries(count);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
