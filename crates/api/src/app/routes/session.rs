use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::SessionContext;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(&body.username, &body.password) {
        Some((token, role)) => Json(dto::LoginResponse {
            token: token.to_string(),
            role: role.as_str(),
        })
        .into_response(),
        None => {
            tracing::warn!(username = %body.username, "login rejected");
            errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid username or password")
        }
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> StatusCode {
    services.logout(&session.token());
    StatusCode::NO_CONTENT
}
