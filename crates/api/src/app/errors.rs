use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockroom_auth::AuthzError;
use stockroom_core::StockroomError;

pub fn stockroom_error_to_response(err: StockroomError) -> axum::response::Response {
    let status = match &err {
        StockroomError::Validation(_) => StatusCode::BAD_REQUEST,
        StockroomError::NotFound(_) => StatusCode::NOT_FOUND,
        StockroomError::InsufficientStock { .. } => StatusCode::CONFLICT,
        StockroomError::Storage(msg) => {
            tracing::error!(error = %msg, "storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    match err {
        StockroomError::InsufficientStock {
            ref part_number,
            requested,
            available,
        } => (
            status,
            axum::Json(json!({
                "error": err.code(),
                "message": err.to_string(),
                "part_number": part_number,
                "requested": requested,
                "available": available,
            })),
        )
            .into_response(),
        other => json_error(status, other.code(), other.to_string()),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
