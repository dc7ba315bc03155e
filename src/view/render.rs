//! Plain-text rendering of a view snapshot for the terminal client.

use chrono::{DateTime, Utc};

use super::state::{Mode, Phase, ViewState};
use crate::models::CommitRecord;

pub fn format_relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - date).num_seconds();

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        let mins = diff / 60;
        format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if diff < 86400 {
        let hours = diff / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if diff < 2592000 {
        let days = diff / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else if diff < 31536000 {
        let months = diff / 2592000;
        format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
    } else {
        let years = diff / 31536000;
        format!("{} year{} ago", years, if years == 1 { "" } else { "s" })
    }
}

fn render_commit(commit: &CommitRecord, now: DateTime<Utc>) -> String {
    let mut meta = format!(
        "    {} • {}",
        commit.author_display_name(),
        format_relative_time(commit.display_date(), now)
    );
    if let Some(account) = &commit.account {
        meta.push_str(&format!(" @{}", account.login));
    }
    format!("{}  {}\n{}", commit.short_sha(), commit.headline(), meta)
}

pub fn render(state: &ViewState, now: DateTime<Utc>) -> String {
    if state.phase() == Phase::InitialLoading {
        return "Loading commits...".to_string();
    }
    if let Some(error) = state.error() {
        return format!("Failed to load commits. {error}");
    }

    let commits = state.visible_commits();
    if commits.is_empty() {
        return "No commits found.".to_string();
    }

    let mut lines: Vec<String> = Vec::with_capacity(commits.len() + 2);
    if state.mode() == Mode::Searching {
        lines.push(format!("Search results for {:?}", state.search().query));
    }
    lines.extend(commits.iter().map(|commit| render_commit(commit, now)));
    if state.is_loading_more() {
        lines.push("Loading…".to_string());
    } else if state.cursor().has_next_page {
        lines.push(format!("(more available, page {} loaded)", state.cursor().page));
    }
    lines.join("\n")
}
