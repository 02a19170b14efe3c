//! Token Generator
//!
//! Produces opaque, URL-safe bearer tokens from a cryptographically secure RNG.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Smallest accepted token size in bytes (128 bits of entropy)
pub const MIN_TOKEN_BYTES: usize = 16;

// == Token Generator ==
/// Generates session tokens.
///
/// Randomness comes from `rand::rng()`, a ChaCha-based CSPRNG seeded from the
/// operating system. If the OS cannot provide entropy the RNG panics; that is
/// an environment failure, not something callers can recover from.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator {
    bytes: usize,
}

impl TokenGenerator {
    /// Creates a generator emitting `DEFAULT_TOKEN_BYTES` of entropy per token.
    pub fn new() -> Self {
        Self {
            bytes: DEFAULT_TOKEN_BYTES,
        }
    }

    /// Creates a generator with a custom entropy size, clamped to `MIN_TOKEN_BYTES`.
    pub fn with_size(bytes: usize) -> Self {
        Self {
            bytes: bytes.max(MIN_TOKEN_BYTES),
        }
    }

    /// Number of random bytes behind each token.
    pub fn entropy_bytes(&self) -> usize {
        self.bytes
    }

    // == Generate ==
    /// Returns a fresh token: random bytes, base64 URL-safe without padding.
    pub fn generate(&self) -> String {
        let mut buffer = vec![0u8; self.bytes];
        rand::rng().fill_bytes(&mut buffer);
        URL_SAFE_NO_PAD.encode(buffer)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
