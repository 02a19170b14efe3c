//! Error types for the session store
//!
//! Provides unified error handling using thiserror, one enum per layer.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deadpool_redis::redis::RedisError;
use serde_json::json;
use thiserror::Error;

/// Message returned to clients whenever the session backend cannot answer.
pub const UNAVAILABLE_MESSAGE: &str = "authentication temporarily unavailable";

// == Cache Error Enum ==
/// Failure talking to the shared cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend could not be reached or rejected the command
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// Round trip exceeded the configured operation timeout
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// Connection parameters could not be turned into a client
    #[error("invalid cache configuration: {0}")]
    Config(String),
}

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

impl From<deadpool_redis::PoolError> for CacheError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

impl From<deadpool_redis::CreatePoolError> for CacheError {
    fn from(err: deadpool_redis::CreatePoolError) -> Self {
        CacheError::Config(err.to_string())
    }
}

// == Session Error Enum ==
/// Errors surfaced by [`crate::session::SessionStore`].
///
/// There is deliberately no "not found" variant: an unknown, revoked or
/// expired token is a normal `Ok(None)` from lookup.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The cache could not complete the round trip
    #[error("session store unavailable: {0}")]
    StoreUnavailable(#[from] CacheError),

    /// Caller passed an owner id the store refuses to persist
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// == Config Error Enum ==
/// Errors raised while loading [`crate::config::Config`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be used
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

// == API Error Enum ==
/// Outcome of the authentication layer as seen by HTTP clients.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No bearer token, or the token maps to no live session
    #[error("authentication required")]
    Unauthenticated,

    /// Session backend unreachable; the request is rejected, never let through
    #[error("authentication temporarily unavailable")]
    Unavailable,

    /// Malformed request data
    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::StoreUnavailable(_) => ApiError::Unavailable,
            SessionError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for session store operations.
pub type Result<T> = std::result::Result<T, SessionError>;
