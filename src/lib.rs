//! Tenant Sessions - Opaque bearer-token session store
//!
//! Issues high-entropy tokens mapped to tenant ids in a shared cache, so any
//! number of API processes can authenticate the same token.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod tasks;
pub mod token;

pub use api::AppState;
pub use cache::{CacheClient, MemoryCache, RedisCache};
pub use config::Config;
pub use error::{ApiError, CacheError, ConfigError, SessionError};
pub use session::{OwnerId, Revocation, SessionSettings, SessionStore};
pub use tasks::spawn_cleanup_task;
pub use token::TokenGenerator;
