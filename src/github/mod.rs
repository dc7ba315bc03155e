//! Upstream commit source: GitHub's REST commit listing and commit search.
//!
//! The services only see the `UpstreamSource` trait; `GitHubClient` is the
//! network implementation and owns the short-lived response cache.

pub mod cache;
pub mod client;
pub mod link;
pub mod wire;

#[cfg(test)]
pub mod testing;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CommitRecord, PageParams};

pub use client::GitHubClient;

/// The single repository this service shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl RepoRef {
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.branch)
    }
}

/// Whether a listing fetch may be answered from the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Cached,
    Bypass,
}

/// One page of normalized commits plus the `Link: rel="next"` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamPage {
    pub commits: Vec<CommitRecord>,
    pub has_next_page: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("upstream returned {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait UpstreamSource: Send + Sync {
    fn repository(&self) -> &RepoRef;

    /// One page of the repository's branch history, newest first.
    async fn list_commits(
        &self,
        token: &str,
        params: PageParams,
        policy: CachePolicy,
    ) -> Result<UpstreamPage, UpstreamError>;

    /// Commit search with a fully built search expression. Never cached.
    async fn search_commits(
        &self,
        token: &str,
        expression: &str,
        params: PageParams,
    ) -> Result<UpstreamPage, UpstreamError>;
}
