//! Session Store
//!
//! Maps tokens to owner ids in the shared cache. Every operation is exactly
//! one bounded cache round trip; expiry is left entirely to the cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::CacheClient;
use crate::error::{CacheError, Result, SessionError};
use crate::session::{OwnerId, SessionSettings};
use crate::token::TokenGenerator;

/// Characters of a token kept in log lines.
const LOGGED_TOKEN_CHARS: usize = 8;

/// Shortest TTL a session can be issued with; both backends count in milliseconds.
const MIN_SESSION_TTL: Duration = Duration::from_millis(1);

// == Revocation ==
/// Outcome of [`SessionStore::revoke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revocation {
    /// The cache acknowledged the delete; the token no longer resolves
    Confirmed,
    /// The delete could not be completed; the record disappears when its TTL runs out
    PendingExpiry,
}

impl Revocation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Revocation::Confirmed)
    }
}

// == Session Store ==
/// Creates, resolves and revokes tenant sessions.
///
/// The cache client is shared: build it once at startup and hand the same
/// `Arc` to every store.
pub struct SessionStore {
    cache: Arc<dyn CacheClient>,
    tokens: TokenGenerator,
    settings: SessionSettings,
}

impl SessionStore {
    // == Constructor ==
    pub fn new(cache: Arc<dyn CacheClient>, settings: SessionSettings) -> Self {
        Self {
            cache,
            tokens: TokenGenerator::new(),
            settings,
        }
    }

    /// Replaces the default token generator.
    pub fn with_token_generator(mut self, tokens: TokenGenerator) -> Self {
        self.tokens = tokens;
        self
    }

    /// Lifetime given to every new session.
    pub fn ttl(&self) -> Duration {
        self.settings.ttl
    }

    // == Create ==
    /// Issues a new token for `owner_id`.
    ///
    /// The owner id is expected to be validated by the caller; negative values
    /// are still refused here without touching the cache, as is a TTL too
    /// short to outlive the call. On
    /// [`SessionError::StoreUnavailable`] the login must be reported as failed.
    pub async fn create(&self, owner_id: OwnerId) -> Result<String> {
        if owner_id < 0 {
            return Err(SessionError::InvalidInput(format!(
                "owner id must be non-negative, got {}",
                owner_id
            )));
        }
        if self.settings.ttl < MIN_SESSION_TTL {
            return Err(SessionError::InvalidInput(format!(
                "session ttl must be at least {:?}, got {:?}",
                MIN_SESSION_TTL, self.settings.ttl
            )));
        }

        let token = self.tokens.generate();
        let key = self.key_for(&token);
        self.bounded(
            self.cache
                .set_with_expiry(&key, &owner_id.to_string(), self.settings.ttl),
        )
        .await?;

        debug!(owner_id, token = %redact(&token), "session created");
        Ok(token)
    }

    // == Lookup ==
    /// Resolves `token` to its owner.
    ///
    /// Unknown, revoked and expired tokens all yield `Ok(None)`; callers
    /// cannot tell them apart. An error means the store could not answer and
    /// the request must be treated as unauthenticated.
    pub async fn lookup(&self, token: &str) -> Result<Option<OwnerId>> {
        let key = self.key_for(token);
        let stored = self.bounded(self.cache.get(&key)).await?;

        Ok(stored.and_then(|value| match value.parse::<OwnerId>() {
            Ok(owner_id) if owner_id >= 0 => Some(owner_id),
            _ => {
                warn!(token = %redact(token), "discarding unparsable session record");
                None
            }
        }))
    }

    // == Revoke ==
    /// Deletes the session for `token`, if any.
    ///
    /// Idempotent and never an error: a failed delete is logged and the
    /// record is left to expire.
    pub async fn revoke(&self, token: &str) -> Revocation {
        let key = self.key_for(token);
        match self.bounded(self.cache.delete(&key)).await {
            Ok(()) => {
                debug!(token = %redact(token), "session revoked");
                Revocation::Confirmed
            }
            Err(err) => {
                warn!(
                    token = %redact(token),
                    error = %err,
                    "session revoke failed, record will expire with its TTL"
                );
                Revocation::PendingExpiry
            }
        }
    }

    fn key_for(&self, token: &str) -> String {
        format!("{}{}", self.settings.key_prefix, token)
    }

    async fn bounded<T, F>(&self, op: F) -> std::result::Result<T, CacheError>
    where
        F: Future<Output = std::result::Result<T, CacheError>>,
    {
        match timeout(self.settings.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.settings.op_timeout)),
        }
    }
}

fn redact(token: &str) -> String {
    token.chars().take(LOGGED_TOKEN_CHARS).collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use async_trait::async_trait;
    use std::collections::HashSet;

    type CacheResult<T> = std::result::Result<T, CacheError>;

    const TTL: Duration = Duration::from_secs(300);
    const OP_TIMEOUT: Duration = Duration::from_millis(100);

    /// Backend that refuses every command.
    struct FailingCache;

    #[async_trait]
    impl CacheClient for FailingCache {
        async fn set_with_expiry(&self, _: &str, _: &str, _: Duration) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn get(&self, _: &str) -> CacheResult<Option<String>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _: &str) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn ping(&self) -> CacheResult<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    /// Backend that never answers within any reasonable timeout.
    struct StalledCache;

    #[async_trait]
    impl CacheClient for StalledCache {
        async fn set_with_expiry(&self, _: &str, _: &str, _: Duration) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn get(&self, _: &str) -> CacheResult<Option<String>> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Some("1".to_string()))
        }

        async fn delete(&self, _: &str) -> CacheResult<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }

        async fn ping(&self) -> CacheResult<()> {
            Ok(())
        }
    }

    fn memory_store() -> (SessionStore, MemoryCache) {
        let cache = MemoryCache::new();
        let store = SessionStore::new(
            Arc::new(cache.clone()),
            SessionSettings::new(TTL, OP_TIMEOUT),
        );
        (store, cache)
    }

    fn store_over(cache: impl CacheClient + 'static) -> SessionStore {
        SessionStore::new(Arc::new(cache), SessionSettings::new(TTL, OP_TIMEOUT))
    }

    #[tokio::test]
    async fn test_create_then_lookup() {
        let (store, _) = memory_store();

        let token = store.create(123).await.unwrap();

        assert!(!token.is_empty());
        assert_eq!(store.lookup(&token).await.unwrap(), Some(123));
    }

    #[tokio::test]
    async fn test_login_logout_scenario() {
        let (store, _) = memory_store();
        let unknown = "nonexistent-token";

        assert_eq!(store.lookup(unknown).await.unwrap(), None);

        let token = store.create(123).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), Some(123));
        assert_eq!(store.lookup(unknown).await.unwrap(), None);

        assert_eq!(store.revoke(&token).await, Revocation::Confirmed);
        assert_eq!(store.lookup(&token).await.unwrap(), None);
        assert_eq!(store.lookup(unknown).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lookup_accepts_any_string() {
        let (store, _) = memory_store();

        assert_eq!(store.lookup("").await.unwrap(), None);
        assert_eq!(store.lookup("   ").await.unwrap(), None);
        assert_eq!(store.lookup("ü\u{0}*?[]").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (store, _) = memory_store();

        assert!(store.revoke("never-issued").await.is_confirmed());

        let token = store.create(5).await.unwrap();
        assert!(store.revoke(&token).await.is_confirmed());
        assert!(store.revoke(&token).await.is_confirmed());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (store, _) = memory_store();

        let first = store.create(1).await.unwrap();
        let second = store.create(2).await.unwrap();
        let same_owner = store.create(1).await.unwrap();
        assert_ne!(first, same_owner);

        store.revoke(&first).await;

        assert_eq!(store.lookup(&first).await.unwrap(), None);
        assert_eq!(store.lookup(&second).await.unwrap(), Some(2));
        assert_eq!(store.lookup(&same_owner).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_session_expires_without_revoke() {
        let cache = MemoryCache::new();
        let store = SessionStore::new(
            Arc::new(cache),
            SessionSettings::new(Duration::from_millis(100), OP_TIMEOUT),
        );

        let token = store.create(77).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), Some(77));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.lookup(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_negative_owner_is_rejected_before_cache() {
        let (store, cache) = memory_store();

        let result = store.create(-1).await;

        assert!(matches!(result, Err(SessionError::InvalidInput(_))));
        assert_eq!(cache.stats().await.round_trips(), 0);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_rejected_before_cache() {
        let cache = MemoryCache::new();
        let store = SessionStore::new(
            Arc::new(cache.clone()),
            SessionSettings::new(Duration::ZERO, OP_TIMEOUT),
        );

        let result = store.create(123).await;

        assert!(matches!(result, Err(SessionError::InvalidInput(_))));
        assert_eq!(cache.stats().await.round_trips(), 0);
    }

    #[tokio::test]
    async fn test_sub_millisecond_ttl_is_rejected() {
        let store = SessionStore::new(
            Arc::new(MemoryCache::new()),
            SessionSettings::new(Duration::from_micros(500), OP_TIMEOUT),
        );

        assert!(matches!(
            store.create(123).await,
            Err(SessionError::InvalidInput(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_and_lookups_do_not_interfere() {
        let cache = MemoryCache::new();
        // Many tasks queue on one lock here
        let store = Arc::new(SessionStore::new(
            Arc::new(cache.clone()),
            SessionSettings::new(TTL, Duration::from_secs(5)),
        ));

        let mut handles = Vec::new();
        for owner_id in 0..500 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let token = store.create(owner_id).await.unwrap();
                let found = store.lookup(&token).await.unwrap();
                let stranger = store.lookup("never-issued").await.unwrap();
                (owner_id, token, found, stranger)
            }));
        }

        let mut tokens = HashSet::new();
        for handle in handles {
            let (owner_id, token, found, stranger) = handle.await.unwrap();
            assert_eq!(found, Some(owner_id));
            assert_eq!(stranger, None);
            assert_eq!(store.lookup(&token).await.unwrap(), Some(owner_id));
            tokens.insert(token);
        }

        assert_eq!(tokens.len(), 500);
        assert_eq!(cache.len().await, 500);
    }

    #[tokio::test]
    async fn test_zero_owner_is_valid() {
        let (store, _) = memory_store();

        let token = store.create(0).await.unwrap();
        assert_eq!(store.lookup(&token).await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_each_operation_is_one_round_trip() {
        let (store, cache) = memory_store();

        let token = store.create(9).await.unwrap();
        assert_eq!(cache.stats().await.round_trips(), 1);

        store.lookup(&token).await.unwrap();
        assert_eq!(cache.stats().await.round_trips(), 2);

        store.revoke(&token).await;
        assert_eq!(cache.stats().await.round_trips(), 3);
    }

    #[tokio::test]
    async fn test_key_prefix_namespaces_records() {
        let cache = MemoryCache::new();
        let store = SessionStore::new(
            Arc::new(cache.clone()),
            SessionSettings::new(TTL, OP_TIMEOUT).with_key_prefix("session:"),
        );

        let token = store.create(42).await.unwrap();

        assert_eq!(
            cache.get(&format!("session:{}", token)).await.unwrap(),
            Some("42".to_string())
        );
        assert_eq!(cache.get(&token).await.unwrap(), None);
        assert_eq!(store.lookup(&token).await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn test_unparsable_record_reads_as_absent() {
        let (store, cache) = memory_store();

        cache.set_with_expiry("forged", "not-a-number", TTL).await.unwrap();
        cache.set_with_expiry("negative", "-4", TTL).await.unwrap();

        assert_eq!(store.lookup("forged").await.unwrap(), None);
        assert_eq!(store.lookup("negative").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failing_backend_fails_closed() {
        let store = store_over(FailingCache);

        assert!(matches!(
            store.create(1).await,
            Err(SessionError::StoreUnavailable(CacheError::Unavailable(_)))
        ));
        assert!(matches!(
            store.lookup("any").await,
            Err(SessionError::StoreUnavailable(_))
        ));
        assert_eq!(store.revoke("any").await, Revocation::PendingExpiry);
    }

    #[tokio::test]
    async fn test_stalled_backend_times_out() {
        let store = store_over(StalledCache);

        assert!(matches!(
            store.create(1).await,
            Err(SessionError::StoreUnavailable(CacheError::Timeout(_)))
        ));
        assert!(matches!(
            store.lookup("any").await,
            Err(SessionError::StoreUnavailable(CacheError::Timeout(_)))
        ));
        assert_eq!(store.revoke("any").await, Revocation::PendingExpiry);
    }

    #[tokio::test]
    async fn test_ten_thousand_tokens_are_distinct() {
        let (store, cache) = memory_store();

        let mut tokens = HashSet::new();
        for owner_id in 0..10_000 {
            tokens.insert(store.create(owner_id % 97).await.unwrap());
        }

        assert_eq!(tokens.len(), 10_000);
        assert_eq!(cache.len().await, 10_000);
    }

    #[tokio::test]
    async fn test_custom_token_generator() {
        let (store, _) = memory_store();
        let store = store.with_token_generator(TokenGenerator::with_size(64));

        let token = store.create(3).await.unwrap();
        assert_eq!(token.len(), 86);
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_redact_keeps_prefix_only() {
        assert_eq!(redact("abcdefghijklmnop"), "abcdefgh");
        assert_eq!(redact("abc"), "abc");
    }
}
