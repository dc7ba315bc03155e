use super::CommitService;
use crate::error::{AppError, Endpoint, Result};
use crate::github::CachePolicy;
use crate::models::{CommitPage, PageParams};

impl CommitService {
    /// One page of the branch history. May be served from the response
    /// cache; `has_next_page` comes from the upstream `Link` header.
    pub async fn list_commits(&self, params: PageParams) -> Result<CommitPage> {
        let token = self.credential()?;

        let page = self
            .upstream
            .list_commits(token, params, CachePolicy::Cached)
            .await
            .map_err(|e| AppError::from_upstream(e, Endpoint::Commits))?;

        Ok(CommitPage {
            commits: page.commits,
            page: params.page,
            per_page: params.per_page,
            has_next_page: page.has_next_page,
        })
    }
}
