//! API route handlers - maps HTTP endpoints to commit service operations.
//!
//! Each submodule defines routes for one operation:
//! - `commits`: paginated branch history (GET /api/commits)
//! - `search`: commit search with fallback (GET /api/commits/search)
//! - `refresh`: uncached first page (POST /api/refresh)

pub mod commits;
pub mod refresh;
pub mod search;

use axum::{Router, http::header, response::IntoResponse};

use crate::service::SharedService;

pub fn create_router(service: SharedService) -> Router {
    Router::new()
        .merge(commits::routes(service.clone()))
        .merge(search::routes(service.clone()))
        .merge(refresh::routes(service))
}

/// Commit pages are already cached upstream; clients must not cache them again.
fn no_store<T: IntoResponse>(body: T) -> impl IntoResponse {
    ([(header::CACHE_CONTROL, "no-store")], body)
}
