//! Commit search with fallback.
//!
//! Queries shorter than three characters never reach the search endpoint;
//! short tokens are unreliable there. They, and searches the endpoint
//! rejects with 422/415/403, are answered by filtering one page of recent
//! commits by message substring. The fallback's `has_next_page` is a guess:
//! a full filtered page is assumed to have a successor.

use super::CommitService;
use crate::error::{AppError, Endpoint, Result};
use crate::github::{CachePolicy, RepoRef};
use crate::models::{CommitPage, PageParams};

pub const MIN_SEARCH_LEN: usize = 3;

const FALLBACK_STATUSES: [u16; 3] = [422, 415, 403];

/// `repo:<owner>/<name> <term>`, quoting the term as a phrase when it
/// contains whitespace.
pub fn search_expression(repo: &RepoRef, query: &str) -> String {
    let term = if query.chars().any(char::is_whitespace) {
        format!("\"{}\"", query.replace('"', ""))
    } else {
        query.to_string()
    };
    format!("repo:{} {}", repo.slug(), term)
}

impl CommitService {
    pub async fn search_commits(&self, query: &str, params: PageParams) -> Result<CommitPage> {
        let token = self.credential()?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(CommitPage::empty(params));
        }

        if query.chars().count() < MIN_SEARCH_LEN {
            tracing::info!("Query {:?} is too short for the search endpoint, filtering recent commits", query);
            return self.filter_recent(token, query, params).await;
        }

        let expression = search_expression(self.upstream.repository(), query);
        match self.upstream.search_commits(token, &expression, params).await {
            Ok(page) => Ok(CommitPage {
                commits: page.commits,
                page: params.page,
                per_page: params.per_page,
                has_next_page: page.has_next_page,
            }),
            Err(err) if err.status().is_some_and(|s| FALLBACK_STATUSES.contains(&s)) => {
                tracing::warn!("Search endpoint rejected {:?} ({}), filtering recent commits", expression, err);
                self.filter_recent(token, query, params)
                    .await
                    .map_err(|fallback_err| {
                        tracing::warn!("Fallback listing failed: {}", fallback_err);
                        AppError::from_upstream(err, Endpoint::Search)
                    })
            }
            Err(err) => Err(AppError::from_upstream(err, Endpoint::Search)),
        }
    }

    /// Fetch one uncached page of recent commits and keep those whose message
    /// contains `query`, case-insensitively, in upstream order.
    async fn filter_recent(&self, token: &str, query: &str, params: PageParams) -> Result<CommitPage> {
        let recent = self
            .upstream
            .list_commits(token, params, CachePolicy::Bypass)
            .await
            .map_err(|e| AppError::from_upstream(e, Endpoint::Commits))?;

        let needle = query.to_lowercase();
        let commits: Vec<_> = recent
            .commits
            .into_iter()
            .filter(|commit| commit.message_contains(&needle))
            .collect();
        let has_next_page = commits.len() == params.per_page as usize;

        Ok(CommitPage {
            commits,
            page: params.page,
            per_page: params.per_page,
            has_next_page,
        })
    }
}
