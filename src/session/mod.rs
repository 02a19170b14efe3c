//! Session Module
//!
//! Issues, resolves and revokes opaque bearer tokens mapped to tenant ids.

mod store;


use std::time::Duration;

use crate::config::Config;

pub use store::{Revocation, SessionStore};

/// Tenant identifier a session belongs to.
pub type OwnerId = i64;

// == Session Settings ==
/// Tunables fixed for the lifetime of a [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Lifetime of every issued session
    pub ttl: Duration,
    /// Bound on each cache round trip
    pub op_timeout: Duration,
    /// Namespace prepended to tokens when used as cache keys
    pub key_prefix: String,
}

impl SessionSettings {
    pub fn new(ttl: Duration, op_timeout: Duration) -> Self {
        Self {
            ttl,
            op_timeout,
            key_prefix: String::new(),
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self::new(config.session_ttl(), config.cache_timeout())
            .with_key_prefix(config.session_key_prefix.clone())
    }
}
