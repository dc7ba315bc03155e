//! Refresh action.
//!
//! POST /api/refresh
//!
//! Re-fetches the first page bypassing the cache. Always answers 200 with
//! `{commits, error?}`; failures are reported in `error`.

use axum::{Json, Router, extract::State, routing::post};

use crate::models::RefreshResult;
use crate::service::SharedService;

pub fn routes(service: SharedService) -> Router {
    Router::new()
        .route("/api/refresh", post(refresh))
        .with_state(service)
}

async fn refresh(State(service): State<SharedService>) -> Json<RefreshResult> {
    Json(service.refresh().await)
}
