use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode, Url, header};

use super::cache::ResponseCache;
use super::link;
use super::wire::{RawCommit, RawSearchResponse, normalize_all};
use super::{CachePolicy, RepoRef, UpstreamError, UpstreamPage, UpstreamSource};
use crate::models::PageParams;

static USER_AGENT: &str = "commit-viewer/0.1";
static API_VERSION: &str = "2022-11-28";
static DEFAULT_ACCEPT: &str = "application/vnd.github+json";
// Commit search needs the text-match media type on some API versions.
static SEARCH_ACCEPT: &str = "application/vnd.github.text-match+json";

pub struct GitHubClient {
    client: Client,
    base_url: String,
    repo: RepoRef,
    cache: ResponseCache<UpstreamPage>,
}

impl GitHubClient {
    pub fn new(base_url: &str, repo: RepoRef, cache_ttl: Duration) -> anyhow::Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(DEFAULT_ACCEPT),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static(API_VERSION),
        );
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            repo,
            cache: ResponseCache::new(cache_ttl),
        })
    }

    fn listing_url(&self, params: PageParams) -> Result<Url, UpstreamError> {
        let base = format!(
            "{}/repos/{}/{}/commits",
            self.base_url, self.repo.owner, self.repo.name
        );
        Url::parse_with_params(
            &base,
            &[
                ("sha", self.repo.branch.clone()),
                ("per_page", params.per_page.to_string()),
                ("page", params.page.to_string()),
            ],
        )
        .map_err(|e| UpstreamError::Transport(format!("Invalid listing URL {base}: {e}")))
    }

    fn search_url(&self, expression: &str, params: PageParams) -> Result<Url, UpstreamError> {
        let base = format!("{}/search/commits", self.base_url);
        Url::parse_with_params(
            &base,
            &[
                ("q", expression.to_string()),
                ("per_page", params.per_page.to_string()),
                ("page", params.page.to_string()),
                ("sort", "committer-date".to_string()),
                ("order", "desc".to_string()),
            ],
        )
        .map_err(|e| UpstreamError::Transport(format!("Invalid search URL {base}: {e}")))
    }

    /// Send a GET and turn non-2xx answers into `UpstreamError::Status`.
    /// Returns the response together with its `rel="next"` flag.
    async fn send(
        &self,
        url: Url,
        token: &str,
        accept: Option<&'static str>,
    ) -> Result<(Response, bool), UpstreamError> {
        let mut request = self.client.get(url.clone()).bearer_auth(token);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::info!("GitHub responded {} for {}", status.as_u16(), url.path());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("GitHub error body for {}: {}", url, body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status_reason(status),
            });
        }

        let has_next = link::has_next_page(
            response
                .headers()
                .get(header::LINK)
                .and_then(|value| value.to_str().ok()),
        );
        Ok((response, has_next))
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unexpected status")
        .to_string()
}

#[async_trait]
impl UpstreamSource for GitHubClient {
    fn repository(&self) -> &RepoRef {
        &self.repo
    }

    async fn list_commits(
        &self,
        token: &str,
        params: PageParams,
        policy: CachePolicy,
    ) -> Result<UpstreamPage, UpstreamError> {
        let url = self.listing_url(params)?;
        let key = url.to_string();

        if policy == CachePolicy::Cached {
            if let Some(page) = self.cache.get(&key) {
                tracing::info!("Serving commits page {} from cache", params.page);
                return Ok(page);
            }
        }

        tracing::info!(
            "Fetching commits page {} ({} per page) from {}",
            params.page,
            params.per_page,
            self.repo
        );
        let (response, has_next_page) = self.send(url, token, None).await?;
        let raw: Vec<RawCommit> = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(format!("Failed to parse commit listing: {e}")))?;

        let page = UpstreamPage {
            commits: normalize_all(raw, Utc::now()),
            has_next_page,
        };
        tracing::info!(
            "Fetched {} commits (page {})",
            page.commits.len(),
            params.page
        );

        // Bypass fetches write through so the next cached read sees them.
        self.cache.insert(key, page.clone());
        let stats = self.cache.stats();
        tracing::debug!(
            "Cache: {} entries ({} fresh), age {}s",
            stats.entries,
            stats.fresh_entries,
            stats.age_secs
        );

        Ok(page)
    }

    async fn search_commits(
        &self,
        token: &str,
        expression: &str,
        params: PageParams,
    ) -> Result<UpstreamPage, UpstreamError> {
        let url = self.search_url(expression, params)?;
        tracing::info!("Searching commits: {} (page {})", expression, params.page);

        let (response, has_next_page) = self.send(url, token, Some(SEARCH_ACCEPT)).await?;
        let body: RawSearchResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(format!("Failed to parse search response: {e}")))?;

        Ok(UpstreamPage {
            commits: normalize_all(body.items, Utc::now()),
            has_next_page,
        })
    }
}
