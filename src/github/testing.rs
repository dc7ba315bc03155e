//! Recording in-memory upstream for service and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CachePolicy, RepoRef, UpstreamError, UpstreamPage, UpstreamSource};
use crate::models::{CommitRecord, PageParams};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List {
        params: PageParams,
        policy: CachePolicy,
    },
    Search {
        expression: String,
        params: PageParams,
    },
}

type Scripted = Result<UpstreamPage, UpstreamError>;

pub struct FakeUpstream {
    repo: RepoRef,
    listings: Mutex<VecDeque<Scripted>>,
    searches: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self {
            repo: RepoRef {
                owner: "krpzzr".to_string(),
                name: "git-commit-history-viewer".to_string(),
                branch: "main".to_string(),
            },
            listings: Mutex::new(VecDeque::new()),
            searches: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(self, response: Scripted) -> Self {
        self.listings.lock().unwrap().push_back(response);
        self
    }

    pub fn with_search(self, response: Scripted) -> Self {
        self.searches.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn page(commits: Vec<CommitRecord>, has_next_page: bool) -> Scripted {
    Ok(UpstreamPage {
        commits,
        has_next_page,
    })
}

pub fn status(code: u16, reason: &str) -> Scripted {
    Err(UpstreamError::Status {
        status: code,
        reason: reason.to_string(),
    })
}

#[async_trait]
impl UpstreamSource for FakeUpstream {
    fn repository(&self) -> &RepoRef {
        &self.repo
    }

    async fn list_commits(
        &self,
        _token: &str,
        params: PageParams,
        policy: CachePolicy,
    ) -> Result<UpstreamPage, UpstreamError> {
        self.calls.lock().unwrap().push(Call::List { params, policy });
        self.listings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| page(Vec::new(), false))
    }

    async fn search_commits(
        &self,
        _token: &str,
        expression: &str,
        params: PageParams,
    ) -> Result<UpstreamPage, UpstreamError> {
        self.calls.lock().unwrap().push(Call::Search {
            expression: expression.to_string(),
            params,
        });
        self.searches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| page(Vec::new(), false))
    }
}
