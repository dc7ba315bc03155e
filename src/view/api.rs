//! Backends the client view can drive: the HTTP API of a running server, or
//! the commit service in-process.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{CommitPage, PageParams, RefreshResult};
use crate::service::SharedService;

/// Errors are plain display strings; the view shows them verbatim.
#[async_trait]
pub trait CommitsApi: Send + Sync {
    async fn fetch_commits(&self, params: PageParams) -> Result<CommitPage, String>;
    async fn search_commits(&self, query: &str, params: PageParams) -> Result<CommitPage, String>;
    async fn refresh(&self) -> RefreshResult;
}

pub struct HttpCommitsApi {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpCommitsApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_page(&self, path: &str, query: &[(&str, String)]) -> Result<CommitPage, String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<ErrorBody> = response.json().await.ok();
            return Err(body
                .map(|b| b.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16())));
        }

        response.json().await.map_err(|e| e.to_string())
    }
}

fn page_query(params: PageParams) -> Vec<(&'static str, String)> {
    vec![
        ("page", params.page.to_string()),
        ("per_page", params.per_page.to_string()),
    ]
}

#[async_trait]
impl CommitsApi for HttpCommitsApi {
    async fn fetch_commits(&self, params: PageParams) -> Result<CommitPage, String> {
        self.get_page("/api/commits", &page_query(params)).await
    }

    async fn search_commits(&self, query: &str, params: PageParams) -> Result<CommitPage, String> {
        let mut pairs = vec![("q", query.to_string())];
        pairs.extend(page_query(params));
        self.get_page("/api/commits/search", &pairs).await
    }

    async fn refresh(&self) -> RefreshResult {
        let url = format!("{}/api/refresh", self.base_url);
        let response = match self.client.post(&url).send().await {
            Ok(response) => response,
            Err(e) => return RefreshResult::failed(e.to_string()),
        };
        response
            .json()
            .await
            .unwrap_or_else(|e| RefreshResult::failed(e.to_string()))
    }
}

/// Calls the commit service directly, without an HTTP hop.
pub struct LocalCommitsApi {
    service: SharedService,
}

impl LocalCommitsApi {
    pub fn new(service: SharedService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommitsApi for LocalCommitsApi {
    async fn fetch_commits(&self, params: PageParams) -> Result<CommitPage, String> {
        self.service
            .list_commits(params)
            .await
            .map_err(|e| e.to_string())
    }

    async fn search_commits(&self, query: &str, params: PageParams) -> Result<CommitPage, String> {
        self.service
            .search_commits(query, params)
            .await
            .map_err(|e| e.to_string())
    }

    async fn refresh(&self) -> RefreshResult {
        self.service.refresh().await
    }
}
