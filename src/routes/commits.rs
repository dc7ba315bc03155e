//! Commit listing endpoint.
//!
//! GET /api/commits?page=<n>&per_page=<n>
//!
//! Returns one page of the branch history with a `hasNextPage` flag taken
//! from GitHub's pagination links. `page` defaults to 1, `per_page` to the
//! configured page size and is clamped to 1..=100.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use super::no_store;
use crate::error::Result;
use crate::models::PageParams;
use crate::service::SharedService;

pub fn routes(service: SharedService) -> Router {
    Router::new()
        .route("/api/commits", get(list_commits))
        .with_state(service)
}

/// Raw strings so malformed numbers fall back to defaults instead of a 400.
#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
    per_page: Option<String>,
}

impl PageQuery {
    fn params(&self, default_per_page: u32) -> PageParams {
        PageParams::from_raw(
            self.page.as_deref(),
            self.per_page.as_deref(),
            default_per_page,
        )
    }
}

async fn list_commits(
    State(service): State<SharedService>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let params = query.params(service.default_per_page());
    let page = service.list_commits(params).await?;
    Ok(no_store(Json(page)))
}
