//! API Module
//!
//! HTTP handlers, routing and the bearer-token middleware.
//!
//! # Endpoints
//! - `GET /session` - Tenant behind the bearer token
//! - `POST /logout` - Revoke the bearer token
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{bearer_token, require_session, AuthenticatedTenant};
pub use routes::create_router;
