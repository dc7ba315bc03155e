//! Commit search endpoint.
//!
//! GET /api/commits/search?q=<text>&page=<n>&per_page=<n>
//!
//! Same response shape as the listing. An empty `q` yields an empty page
//! without contacting GitHub.

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
        .route("/api/commits/search", get(search_commits))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
    page: Option<String>,
    per_page: Option<String>,
}

async fn search_commits(
    State(service): State<SharedService>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let params = PageParams::from_raw(
        query.page.as_deref(),
        query.per_page.as_deref(),
        service.default_per_page(),
    );
    let page = service.search_commits(&query.q, params).await?;
    Ok(no_store(Json(page)))
}
