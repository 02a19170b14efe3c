//! Session Authentication Middleware
//!
//! Resolves `Authorization: Bearer <token>` through the session store and
//! rejects the request unless a live session is found. Backend failures are
//! rejected too; nothing is let through on doubt.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::error;

use super::handlers::AppState;
use crate::error::ApiError;
use crate::session::OwnerId;

/// Tenant resolved for the current request, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedTenant {
    pub owner_id: OwnerId,
}

/// Extracts the bearer token from the Authorization header, if well formed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware guarding routes that need an authenticated tenant.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or(ApiError::Unauthenticated)?
        .to_owned();

    match state.sessions.lookup(&token).await {
        Ok(Some(owner_id)) => {
            req.extensions_mut().insert(AuthenticatedTenant { owner_id });
            Ok(next.run(req).await)
        }
        Ok(None) => Err(ApiError::Unauthenticated),
        Err(err) => {
            error!(error = %err, "session lookup failed, rejecting request");
            Err(err.into())
        }
    }
}
