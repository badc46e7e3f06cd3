//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring and the add/issue workflows
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and input parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use stockroom_infra::StockroomConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router over the configured CSV files (used by `main.rs`).
pub fn build_app(config: &StockroomConfig) -> Router {
    build_router(Arc::new(services::AppServices::from_config(config)))
}

/// Build the router over already-wired services.
pub fn build_router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        sessions: services.sessions().clone(),
    };

    // Protected routes: require a live session.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/session/login", post(routes::session::login))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
