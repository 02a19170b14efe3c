//! API Handlers
//!
//! HTTP request handlers for the session endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};

use super::middleware::{bearer_token, AuthenticatedTenant};
use crate::cache::CacheClient;
use crate::error::ApiError;
use crate::models::{HealthResponse, LogoutResponse, SessionResponse};
use crate::session::{SessionSettings, SessionStore};

/// Application state shared across all handlers.
///
/// Holds the one cache client built at startup and the session store using it.
#[derive(Clone)]
pub struct AppState {
    /// Session store used by the auth middleware and logout
    pub sessions: Arc<SessionStore>,
    /// Cache client, kept for health checks and shutdown
    pub cache: Arc<dyn CacheClient>,
    /// Bound on health-check pings
    pub cache_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState around an already constructed cache client.
    pub fn new(cache: Arc<dyn CacheClient>, settings: SessionSettings) -> Self {
        let cache_timeout = settings.op_timeout;
        Self {
            sessions: Arc::new(SessionStore::new(cache.clone(), settings)),
            cache,
            cache_timeout,
        }
    }
}

/// Handler for GET /session
///
/// Returns the tenant behind the presented bearer token. Only reachable
/// through `require_session`.
pub async fn session_handler(
    Extension(tenant): Extension<AuthenticatedTenant>,
) -> Json<SessionResponse> {
    Json(SessionResponse::new(tenant.owner_id))
}

/// Handler for POST /logout
///
/// Revokes the presented token. Succeeds for unknown or expired tokens too.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = bearer_token(&headers).ok_or(ApiError::Unauthenticated)?;
    let revocation = state.sessions.revoke(token).await;

    Ok(Json(LogoutResponse::new(revocation.is_confirmed())))
}

/// Handler for GET /health
///
/// Reports 503 when the cache does not answer a ping in time.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let reachable = matches!(
        tokio::time::timeout(state.cache_timeout, state.cache.ping()).await,
        Ok(Ok(()))
    );

    let status = if reachable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::from_cache_reachable(reachable)))
}
