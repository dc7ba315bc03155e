use super::CommitService;
use crate::error::{AppError, Endpoint, Result};
use crate::github::CachePolicy;
use crate::models::{CommitRecord, PageParams, RefreshResult};

impl CommitService {
    /// First page at the default size, never from cache. Failures come back
    /// as `error` next to an empty list so callers can tell "no commits"
    /// apart from "fetch failed".
    pub async fn refresh(&self) -> RefreshResult {
        match self.fetch_fresh().await {
            Ok(commits) => {
                tracing::info!("Refreshed {} commits", commits.len());
                RefreshResult {
                    commits,
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!("Refresh failed: {}", err);
                RefreshResult::failed(err.to_string())
            }
        }
    }

    async fn fetch_fresh(&self) -> Result<Vec<CommitRecord>> {
        let token = self.credential()?;
        let page = self
            .upstream
            .list_commits(token, PageParams::first(self.per_page), CachePolicy::Bypass)
            .await
            .map_err(|e| AppError::from_upstream(e, Endpoint::Commits))?;
        Ok(page.commits)
    }
}
