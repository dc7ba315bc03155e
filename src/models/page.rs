use serde::{Deserialize, Serialize};

use super::CommitRecord;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// A validated page request: `page >= 1`, `per_page` in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub per_page: u32,
}

impl PageParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Parse raw query-string values leniently. Only the leading integer is
    /// read (`"50abc"` is 50, `"2.5"` is 2); values with no leading digits
    /// fall back to the defaults, out-of-range values are clamped.
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>, default_per_page: u32) -> Self {
        let page = parse_i64(page).unwrap_or(DEFAULT_PAGE as i64);
        let per_page = parse_i64(per_page).unwrap_or(default_per_page as i64);
        Self {
            page: page.clamp(1, u32::MAX as i64) as u32,
            per_page: per_page.clamp(1, MAX_PER_PAGE as i64) as u32,
        }
    }

    pub fn first(per_page: u32) -> Self {
        Self::new(DEFAULT_PAGE, per_page)
    }
}

fn parse_i64(raw: Option<&str>) -> Option<i64> {
    let value = raw?.trim_start();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    // All digits, so the only failure left is overflow.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Response body of the listing and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitPage {
    pub commits: Vec<CommitRecord>,
    pub page: u32,
    pub per_page: u32,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
}

impl CommitPage {
    pub fn empty(params: PageParams) -> Self {
        Self {
            commits: Vec::new(),
            page: params.page,
            per_page: params.per_page,
            has_next_page: false,
        }
    }
}

/// Result of the refresh action. Failures are reported in `error` rather
/// than as an HTTP error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResult {
    pub commits: Vec<CommitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RefreshResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            commits: Vec::new(),
            error: Some(error.into()),
        }
    }
}
