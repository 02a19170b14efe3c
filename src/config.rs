//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Server configuration parameters.
///
/// Everything except the session TTL has a default. The TTL must be chosen
/// explicitly by the deployment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Session lifetime in seconds
    pub session_ttl: u64,
    /// Namespace prepended to tokens when used as cache keys
    pub session_key_prefix: String,
    /// Cache endpoint: `redis://`, `rediss://` or `memory://`
    pub cache_url: String,
    /// Maximum pooled cache connections
    pub cache_pool_size: usize,
    /// Bound on each cache round trip, in milliseconds
    pub cache_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Sweep interval in seconds for the in-process backend
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a Config with the given session TTL and defaults for everything else.
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            session_ttl: session_ttl.as_secs().max(1),
            session_key_prefix: String::new(),
            cache_url: "redis://127.0.0.1:6379".to_string(),
            cache_pool_size: 16,
            cache_timeout_ms: 500,
            server_port: 3000,
            cleanup_interval: 1,
        }
    }

    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SESSION_TTL_SECS` - Session lifetime in seconds (required, > 0)
    /// - `SESSION_KEY_PREFIX` - Cache key namespace (default: empty)
    /// - `CACHE_URL` - Cache endpoint (default: redis://127.0.0.1:6379)
    /// - `CACHE_POOL_SIZE` - Max pooled connections (default: 16)
    /// - `CACHE_TIMEOUT_MS` - Per round-trip timeout (default: 500)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - In-process sweep frequency in seconds (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Optional settings with unparsable values keep their defaults, as do a
    /// zero pool size or timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_ttl = lookup("SESSION_TTL_SECS").ok_or(ConfigError::Missing("SESSION_TTL_SECS"))?;
        let session_ttl = match raw_ttl.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "SESSION_TTL_SECS",
                    value: raw_ttl,
                })
            }
        };

        let defaults = Self::new(Duration::from_secs(session_ttl));

        Ok(Self {
            session_ttl,
            session_key_prefix: lookup("SESSION_KEY_PREFIX").unwrap_or(defaults.session_key_prefix),
            cache_url: lookup("CACHE_URL").unwrap_or(defaults.cache_url),
            cache_pool_size: parse_nonzero_or(
                &lookup,
                "CACHE_POOL_SIZE",
                defaults.cache_pool_size,
            ),
            cache_timeout_ms: parse_nonzero_or(
                &lookup,
                "CACHE_TIMEOUT_MS",
                defaults.cache_timeout_ms,
            ),
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            cleanup_interval: parse_or(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval),
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_nonzero_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + Default + PartialEq,
{
    let value = parse_or(lookup, key, default);
    if value == T::default() {
        // zero pool or timeout would fail every request
        return default;
    }
    value
}
