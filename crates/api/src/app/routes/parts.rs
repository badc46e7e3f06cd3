use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockroom_auth::Permission;
use stockroom_core::StockroomError;

use crate::app::{dto, errors};
use crate::app::services::{self, AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_parts).post(add_part))
        .route("/lookup", get(lookup_part))
        .route("/search", get(search_parts))
        .route("/autofill", get(autofill))
        .route("/issue", post(issue_part))
}

pub async fn list_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_READ) {
        return errors::authz_error_to_response(e);
    }

    match services::run_blocking(&services, |s| s.parts_list()).await {
        Ok(parts) => Json(dto::part_views(parts)).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

pub async fn lookup_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(q): Query<dto::LookupQuery>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_READ) {
        return errors::authz_error_to_response(e);
    }

    let dto::LookupQuery { part_number, part_name } = q;
    let key = part_number
        .clone()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| part_name.clone())
        .unwrap_or_default();

    let found = services::run_blocking(&services, move |s| {
        s.parts_lookup(part_number.as_deref(), part_name.as_deref())
    })
    .await;

    match found {
        Ok(Some(part)) => Json(dto::PartView::from(part)).into_response(),
        Ok(None) => errors::stockroom_error_to_response(StockroomError::not_found(key)),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

pub async fn search_parts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(q): Query<dto::SearchQuery>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_READ) {
        return errors::authz_error_to_response(e);
    }

    match services::run_blocking(&services, move |s| s.parts_search(&q.keyword)).await {
        Ok(parts) => Json(dto::part_views(parts)).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

pub async fn autofill(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_READ) {
        return errors::authz_error_to_response(e);
    }

    match services::run_blocking(&services, |s| s.parts_autofill()).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

pub async fn add_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::AddPartRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_WRITE) {
        return errors::authz_error_to_response(e);
    }

    let new_part = match body.into_new_part() {
        Ok(p) => p,
        Err(e) => return errors::stockroom_error_to_response(e),
    };

    match services::run_blocking(&services, move |s| s.add_part(new_part)).await {
        Ok(movement) => (StatusCode::CREATED, Json(dto::MovementResponse::from(movement))).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

pub async fn issue_part(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::IssueRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::PARTS_WRITE) {
        return errors::authz_error_to_response(e);
    }

    let quantity = match body.quantity.parse() {
        Ok(q) => q,
        Err(e) => return errors::stockroom_error_to_response(e),
    };

    let part_number = body.part_number.trim().to_string();
    match services::run_blocking(&services, move |s| s.issue_part(&part_number, quantity)).await {
        Ok(movement) => Json(dto::MovementResponse::from(movement)).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}
