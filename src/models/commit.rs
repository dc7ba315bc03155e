use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized commit. Serialized in the same shape GitHub's listing
/// endpoint uses so existing front ends can consume it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetails,
    /// Linked platform account, `null` when the commit has none.
    #[serde(rename = "author")]
    pub account: Option<AccountInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: Signature,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<CommitterInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitterInfo {
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn headline(&self) -> &str {
        self.commit.message.lines().next().unwrap_or("")
    }

    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    /// Committer date when known, author date otherwise.
    pub fn display_date(&self) -> DateTime<Utc> {
        self.commit
            .committer
            .as_ref()
            .map(|c| c.date)
            .unwrap_or(self.commit.author.date)
    }

    pub fn author_display_name(&self) -> &str {
        if !self.commit.author.name.is_empty() {
            return &self.commit.author.name;
        }
        self.account
            .as_ref()
            .map(|a| a.login.as_str())
            .unwrap_or("Unknown")
    }

    pub fn message_contains(&self, lowered_needle: &str) -> bool {
        self.commit.message.to_lowercase().contains(lowered_needle)
    }
}

#[cfg(test)]
pub(crate) fn sample(sha: &str, message: &str) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        html_url: format!("https://github.com/krpzzr/git-commit-history-viewer/commit/{sha}"),
        commit: CommitDetails {
            message: message.to_string(),
            author: Signature {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                date: "2024-05-01T10:00:00Z".parse().unwrap(),
            },
            committer: None,
        },
        account: None,
    }
}
