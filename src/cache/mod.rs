//! Cache Module
//!
//! Abstraction over the shared key-value cache holding session records, with
//! a Redis backend for production and an in-process backend for tests and
//! single-node development.

mod entry;
mod memory;
mod redis;
mod stats;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheError;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use redis::RedisCache;
pub use stats::CacheStats;

/// URL scheme selecting the in-process backend.
pub const MEMORY_SCHEME: &str = "memory://";

// == Cache Client ==
/// Single-key operations the session store needs from its cache.
///
/// Each method is one atomic round trip. Implementations are shared across
/// request tasks behind an `Arc` and must not open a connection per call.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value, expiring after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration)
        -> Result<(), CacheError>;

    /// Returns the live value under `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Removes `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Checks that the backend answers.
    async fn ping(&self) -> Result<(), CacheError>;

    /// Releases pooled connections. Called once during process shutdown.
    async fn shutdown(&self) {}
}
