use axum::{
    routing::{get, post},
    Router,
};

pub mod parts;
pub mod reports;
pub mod session;
pub mod system;

/// Router for all authenticated (session-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/session/logout", post(session::logout))
        .nest("/parts", parts::router())
        .nest("/reports", reports::router())
}
