//! Commit retrieval, search and refresh on top of an `UpstreamSource`.
//!
//! Each submodule adds one operation to `CommitService`:
//! - `retrieval`: one cached page of the branch history
//! - `search`: search endpoint with listing+filter fallback
//! - `refresh`: uncached first page, errors folded into the result
//!
//! Every entry point checks the credential before touching the network.

pub mod refresh;
pub mod retrieval;
pub mod search;

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::github::UpstreamSource;

pub struct CommitService {
    upstream: Arc<dyn UpstreamSource>,
    token: Option<String>,
    per_page: u32,
}

impl CommitService {
    pub fn new(upstream: Arc<dyn UpstreamSource>, token: Option<String>, per_page: u32) -> Self {
        Self {
            upstream,
            token: token.filter(|t| !t.trim().is_empty()),
            per_page,
        }
    }

    pub fn default_per_page(&self) -> u32 {
        self.per_page
    }

    fn credential(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) => Ok(token),
            None => {
                tracing::warn!("GITHUB_TOKEN is not configured, refusing to call GitHub");
                Err(AppError::Configuration)
            }
        }
    }
}

pub type SharedService = Arc<CommitService>;


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::error::AppError;
    use crate::github::testing::FakeUpstream;
    use crate::models::PageParams;

    #[tokio::test]
    async fn missing_token_fails_every_entry_point_without_network() {
        let (service, upstream) = service_without_token(FakeUpstream::new());

        let listed = service.list_commits(PageParams::new(1, 20)).await;
        assert_eq!(listed, Err(AppError::Configuration));

        let searched = service.search_commits("fix bug", PageParams::new(1, 20)).await;
        assert_eq!(searched, Err(AppError::Configuration));

        let refreshed = service.refresh().await;
        assert!(refreshed.commits.is_empty());
        assert_eq!(refreshed.error.as_deref(), Some("GitHub token not configured."));

        assert!(upstream.calls().is_empty(), "no upstream call expected");
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let upstream = std::sync::Arc::new(FakeUpstream::new());
        let service = super::CommitService::new(upstream, Some("  ".to_string()), 20);
        assert_eq!(service.credential(), Err(AppError::Configuration));
    }
}
