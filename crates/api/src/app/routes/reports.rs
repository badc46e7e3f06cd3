use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockroom_auth::Permission;

use crate::app::{dto, errors};
use crate::app::services::{self, AppServices};
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new()
        .route("/to-order", get(to_order))
        .route("/top-issued", get(top_issued))
}

/// Parts whose quantity is below their reorder threshold.
pub async fn to_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::REPORTS_READ) {
        return errors::authz_error_to_response(e);
    }

    match services::run_blocking(&services, |s| s.low_stock()).await {
        Ok(parts) => Json(dto::part_views(parts)).into_response(),
        Err(e) => errors::stockroom_error_to_response(e),
    }
}

/// Issued totals per part; `?order=total` ranks by quantity issued.
pub async fn top_issued(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Query(q): Query<dto::TopIssuedQuery>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&session, &Permission::REPORTS_READ) {
        return errors::authz_error_to_response(e);
    }

    match services::run_blocking(&services, |s| s.top_issued()).await {
        Ok(report) => {
            let report = match q.order {
                dto::TopIssuedOrder::Key => report,
                dto::TopIssuedOrder::Total => report.ranked_by_total(),
            };
            Json(report).into_response()
        }
        Err(e) => errors::stockroom_error_to_response(e),
    }
}
