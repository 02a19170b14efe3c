//! Response DTOs for the session API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::session::OwnerId;

/// Response body for GET /session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Tenant the presented token belongs to
    pub owner_id: OwnerId,
}

impl SessionResponse {
    pub fn new(owner_id: OwnerId) -> Self {
        Self { owner_id }
    }
}

/// Response body for POST /logout
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// `false` when the backend could not confirm the delete; the session
    /// then ends at its TTL
    pub revoked: bool,
}

impl LogoutResponse {
    pub fn new(revoked: bool) -> Self {
        Self { revoked }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "up" or "down"
    pub cache: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse reflecting cache reachability.
    pub fn from_cache_reachable(reachable: bool) -> Self {
        let (status, cache) = if reachable {
            ("healthy", "up")
        } else {
            ("degraded", "down")
        };
        Self {
            status: status.to_string(),
            cache: cache.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
