//! Raw GitHub JSON shapes and their normalization into `CommitRecord`.
//!
//! Listing and search items share one lenient shape: every field the API may
//! omit or null out is optional here and defaulted during normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{AccountInfo, CommitDetails, CommitRecord, CommitterInfo, Signature};

#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub commit: Option<RawCommitBody>,
    #[serde(default)]
    pub author: Option<RawAccount>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCommitBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<RawSignature>,
    #[serde(default)]
    pub committer: Option<RawSignature>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RawAccount {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub items: Vec<RawCommit>,
}

impl RawCommit {
    /// Author name prefers the commit signature, then the account login,
    /// then "Unknown". Missing dates become `now`.
    pub fn normalize(self, now: DateTime<Utc>) -> CommitRecord {
        let body = self.commit.unwrap_or_default();
        let signature = body.author.unwrap_or_default();

        let account = self.author.and_then(|account| {
            let login = account.login.filter(|l| !l.is_empty())?;
            Some(AccountInfo {
                login,
                avatar_url: account.avatar_url.unwrap_or_default(),
                html_url: account.html_url.unwrap_or_default(),
            })
        });

        let name = signature
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| account.as_ref().map(|a| a.login.clone()))
            .unwrap_or_else(|| "Unknown".to_string());

        CommitRecord {
            sha: self.sha,
            html_url: self.html_url.unwrap_or_default(),
            commit: CommitDetails {
                message: body.message.unwrap_or_default(),
                author: Signature {
                    name,
                    email: signature.email.unwrap_or_default(),
                    date: signature.date.unwrap_or(now),
                },
                committer: body
                    .committer
                    .and_then(|c| c.date)
                    .map(|date| CommitterInfo { date }),
            },
            account,
        }
    }
}

pub fn normalize_all(raw: Vec<RawCommit>, now: DateTime<Utc>) -> Vec<CommitRecord> {
    raw.into_iter().map(|commit| commit.normalize(now)).collect()
}
