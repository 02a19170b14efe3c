//! API Routes
//!
//! Configures the Axum router with the session endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, logout_handler, session_handler, AppState};
use super::middleware::require_session;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /session` - Tenant behind the bearer token (authenticated)
/// - `POST /logout` - Revoke the bearer token
/// - `GET /health` - Health check including cache reachability
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/session", get(session_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(protected)
        .route("/logout", post(logout_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
