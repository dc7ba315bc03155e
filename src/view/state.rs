//! Client view state machine.
//!
//! Actions are split into `begin_*` (decide what to request, update modes)
//! and `complete` (apply the response). Replacing actions (mount, refresh,
//! search, exit search) bump `generation`; a completion carrying an older
//! generation is discarded, so a slow response can never overwrite the
//! result of a newer action. Load-more keeps the generation it started in.

use crate::models::{CommitPage, CommitRecord, PageParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InitialLoading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Listing,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page: u32,
    pub per_page: u32,
    pub has_next_page: bool,
}

impl Cursor {
    fn reset(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            has_next_page: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub query: String,
    pub active: bool,
}

/// What the driver has to fetch for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List(PageParams),
    Search { query: String, params: PageParams },
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Mount,
    Refresh,
    Reconcile,
    Search,
    ExitSearch,
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub kind: ActionKind,
    pub request: Request,
}

impl Ticket {
    /// Silent page-1 re-fetch after a successful refresh. Shares the
    /// refresh's generation so a newer action still wins.
    pub fn reconcile(&self, per_page: u32) -> Ticket {
        Ticket {
            generation: self.generation,
            kind: ActionKind::Reconcile,
            request: Request::List(PageParams::first(per_page)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Page(CommitPage),
    Refreshed(Vec<CommitRecord>),
    Failed(String),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Page(_) => "page",
            Outcome::Refreshed(_) => "refreshed",
            Outcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    phase: Phase,
    commits: Vec<CommitRecord>,
    cursor: Cursor,
    search: SearchState,
    error: Option<String>,
    loading_more: bool,
    generation: u64,
}

impl ViewState {
    pub fn new(per_page: u32) -> Self {
        Self {
            phase: Phase::InitialLoading,
            commits: Vec::new(),
            cursor: Cursor::reset(per_page),
            search: SearchState::default(),
            error: None,
            loading_more: false,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        if self.search.active {
            Mode::Searching
        } else {
            Mode::Listing
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    /// Commits to show. An error suppresses the list without dropping it.
    pub fn visible_commits(&self) -> &[CommitRecord] {
        if self.error.is_some() {
            &[]
        } else {
            &self.commits
        }
    }

    #[cfg(test)]
    pub fn loaded_commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    fn replace_action(&mut self, kind: ActionKind, request: Request) -> Ticket {
        self.generation += 1;
        self.cursor = Cursor::reset(self.cursor.per_page);
        self.loading_more = false;
        Ticket {
            generation: self.generation,
            kind,
            request,
        }
    }

    pub fn begin_mount(&mut self) -> Ticket {
        self.phase = Phase::InitialLoading;
        self.search = SearchState::default();
        let first = PageParams::first(self.cursor.per_page);
        self.replace_action(ActionKind::Mount, Request::List(first))
    }

    pub fn begin_refresh(&mut self) -> Ticket {
        self.replace_action(ActionKind::Refresh, Request::Refresh)
    }

    /// Empty (after trimming) exits search mode and reloads the listing.
    pub fn begin_search(&mut self, raw_query: &str) -> Ticket {
        let query = raw_query.trim();
        let first = PageParams::first(self.cursor.per_page);

        if query.is_empty() {
            self.search = SearchState::default();
            return self.replace_action(ActionKind::ExitSearch, Request::List(first));
        }

        self.search = SearchState {
            query: query.to_string(),
            active: true,
        };
        let request = Request::Search {
            query: query.to_string(),
            params: first,
        };
        self.replace_action(ActionKind::Search, request)
    }

    /// `None` while another page is loading, when no further page exists, or
    /// when the list is not currently shown.
    pub fn begin_load_more(&mut self) -> Option<Ticket> {
        if self.phase != Phase::Ready
            || self.loading_more
            || !self.cursor.has_next_page
            || self.error.is_some()
        {
            return None;
        }

        self.loading_more = true;
        let params = PageParams::new(self.cursor.page + 1, self.cursor.per_page);
        let request = match self.mode() {
            Mode::Searching => Request::Search {
                query: self.search.query.clone(),
                params,
            },
            Mode::Listing => Request::List(params),
        };

        Some(Ticket {
            generation: self.generation,
            kind: ActionKind::LoadMore,
            request,
        })
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a response. Returns `false` when the ticket was stale or the
    /// outcome does not fit the action, and the outcome was dropped.
    pub fn complete(&mut self, ticket: &Ticket, outcome: Outcome) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "Discarding stale {:?} response (generation {} < {})",
                ticket.kind,
                ticket.generation,
                self.generation
            );
            return false;
        }

        match (ticket.kind, outcome) {
            (ActionKind::Mount | ActionKind::Search | ActionKind::ExitSearch, Outcome::Page(page)) => {
                self.phase = Phase::Ready;
                self.show_first_page(page);
            }
            (
                ActionKind::Mount | ActionKind::Search | ActionKind::ExitSearch,
                Outcome::Failed(message),
            ) => {
                self.phase = Phase::Ready;
                self.error = Some(message);
            }
            (ActionKind::Refresh, Outcome::Refreshed(commits)) => {
                self.phase = Phase::Ready;
                self.show_refreshed(commits);
            }
            (ActionKind::Refresh, Outcome::Failed(message)) => {
                self.phase = Phase::Ready;
                self.commits.clear();
                self.cursor = Cursor::reset(self.cursor.per_page);
                self.search = SearchState::default();
                self.error = Some(message);
            }
            (ActionKind::Reconcile, Outcome::Page(page)) => {
                // A load-more that landed after the refresh already settled
                // the cursor from the listing; keep its pages.
                if self.cursor.page > 1 {
                    tracing::debug!(
                        "Skipping reconcile, page {} already loaded",
                        self.cursor.page
                    );
                } else {
                    self.show_first_page(page);
                }
            }
            (ActionKind::Reconcile, Outcome::Failed(message)) => {
                tracing::warn!("Reconciling refreshed commits failed: {}", message);
            }
            (ActionKind::LoadMore, Outcome::Page(page)) => {
                self.loading_more = false;
                self.commits.extend(page.commits);
                self.cursor.page = page.page;
                self.cursor.has_next_page = page.has_next_page;
                self.error = None;
            }
            (ActionKind::LoadMore, Outcome::Failed(message)) => {
                self.loading_more = false;
                self.error = Some(message);
            }
            (kind, outcome) => {
                tracing::warn!(
                    "Ignoring {} outcome for {:?} action",
                    outcome.label(),
                    kind
                );
                match kind {
                    ActionKind::LoadMore => self.loading_more = false,
                    ActionKind::Reconcile => {}
                    _ => self.phase = Phase::Ready,
                }
                return false;
            }
        }
        true
    }

    fn show_first_page(&mut self, page: CommitPage) {
        self.commits = page.commits;
        self.cursor = Cursor {
            page: 1,
            per_page: self.cursor.per_page,
            has_next_page: page.has_next_page,
        };
        self.error = None;
    }

    /// Optimistic: a full refreshed page is assumed to have a successor
    /// until the reconciliation fetch says otherwise.
    fn show_refreshed(&mut self, commits: Vec<CommitRecord>) {
        let full = commits.len() >= self.cursor.per_page as usize;
        self.commits = commits;
        self.search = SearchState::default();
        self.cursor = Cursor {
            page: 1,
            per_page: self.cursor.per_page,
            has_next_page: full,
        };
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commit::sample;

    fn page_of(n: usize, page: u32, has_next: bool) -> CommitPage {
        CommitPage {
            commits: (0..n).map(|i| sample(&format!("p{page}-{i}"), "msg")).collect(),
            page,
            per_page: 3,
            has_next_page: has_next,
        }
    }

    fn ready(has_next: bool) -> ViewState {
        let mut state = ViewState::new(3);
        let ticket = state.begin_mount();
        state.complete(&ticket, Outcome::Page(page_of(3, 1, has_next)));
        state
    }

    #[test]
    fn mount_moves_to_ready_listing() {
        let mut state = ViewState::new(3);
        let ticket = state.begin_mount();
        assert_eq!(state.phase(), Phase::InitialLoading);
        assert_eq!(ticket.request, Request::List(PageParams::new(1, 3)));

        assert!(state.complete(&ticket, Outcome::Page(page_of(3, 1, true))));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.mode(), Mode::Listing);
        assert_eq!(state.visible_commits().len(), 3);
        assert!(state.cursor().has_next_page);
    }

    #[test]
    fn failed_mount_is_ready_with_error() {
        let mut state = ViewState::new(3);
        let ticket = state.begin_mount();
        state.complete(&ticket, Outcome::Failed("GitHub token not configured.".to_string()));

        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.error(), Some("GitHub token not configured."));
        assert!(state.visible_commits().is_empty());
    }

    #[test]
    fn load_more_appends_and_advances() {
        let mut state = ready(true);

        let ticket = state.begin_load_more().unwrap();
        assert_eq!(ticket.request, Request::List(PageParams::new(2, 3)));
        assert!(state.is_loading_more());
        assert!(state.begin_load_more().is_none(), "re-entrant load-more must be a no-op");

        state.complete(&ticket, Outcome::Page(page_of(2, 2, false)));
        assert_eq!(state.visible_commits().len(), 5);
        assert_eq!(state.cursor().page, 2);
        assert!(!state.cursor().has_next_page);
        assert!(!state.is_loading_more());
        assert!(state.begin_load_more().is_none(), "no further page");
    }

    #[test]
    fn failed_load_more_keeps_loaded_commits() {
        let mut state = ready(true);
        let ticket = state.begin_load_more().unwrap();
        state.complete(&ticket, Outcome::Failed("GitHub API error: 502 - Bad Gateway".to_string()));

        assert_eq!(state.error(), Some("GitHub API error: 502 - Bad Gateway"));
        assert_eq!(state.cursor().page, 1, "cursor only advances on success");
        assert_eq!(state.loaded_commits().len(), 3);
        assert!(state.visible_commits().is_empty());
    }

    #[test]
    fn search_uses_search_requests_for_more_pages() {
        let mut state = ready(true);
        let ticket = state.begin_search("  fix bug ");
        assert_eq!(
            ticket.request,
            Request::Search {
                query: "fix bug".to_string(),
                params: PageParams::new(1, 3),
            }
        );
        state.complete(&ticket, Outcome::Page(page_of(3, 1, true)));
        assert_eq!(state.mode(), Mode::Searching);

        let more = state.begin_load_more().unwrap();
        assert_eq!(
            more.request,
            Request::Search {
                query: "fix bug".to_string(),
                params: PageParams::new(2, 3),
            }
        );
    }

    #[test]
    fn blank_search_exits_search_mode() {
        let mut state = ready(false);
        let search = state.begin_search("ui");
        state.complete(&search, Outcome::Page(page_of(1, 1, false)));

        let exit = state.begin_search("   ");
        assert_eq!(exit.kind, ActionKind::ExitSearch);
        assert_eq!(exit.request, Request::List(PageParams::new(1, 3)));
        assert_eq!(state.mode(), Mode::Listing);
        state.complete(&exit, Outcome::Page(page_of(3, 1, true)));
        assert_eq!(state.visible_commits().len(), 3);
    }

    #[test]
    fn stale_search_response_is_discarded() {
        let mut state = ready(false);
        let search = state.begin_search("refactor");
        let exit = state.begin_search("");

        state.complete(&exit, Outcome::Page(page_of(3, 1, true)));
        assert!(!state.complete(&search, Outcome::Page(page_of(1, 1, false))));

        assert_eq!(state.mode(), Mode::Listing);
        assert_eq!(state.visible_commits().len(), 3);
        assert!(state.cursor().has_next_page);
    }

    #[test]
    fn load_more_superseded_by_search_is_dropped() {
        let mut state = ready(true);
        let more = state.begin_load_more().unwrap();
        let search = state.begin_search("cache");
        assert!(!state.is_loading_more());

        state.complete(&search, Outcome::Page(page_of(1, 1, false)));
        assert!(!state.complete(&more, Outcome::Page(page_of(3, 2, true))));
        assert_eq!(state.visible_commits().len(), 1);
    }

    #[test]
    fn refresh_error_clears_list() {
        let mut state = ready(true);
        let ticket = state.begin_refresh();
        state.complete(&ticket, Outcome::Failed("GitHub authorization error.".to_string()));

        assert!(state.loaded_commits().is_empty());
        assert_eq!(state.error(), Some("GitHub authorization error."));
        assert_eq!(state.mode(), Mode::Listing);
        assert_eq!(state.cursor(), Cursor::reset(3));
    }

    #[test]
    fn refresh_success_exits_search_then_reconciles() {
        let mut state = ready(false);
        let search = state.begin_search("cache");
        state.complete(&search, Outcome::Failed("boom".to_string()));

        let refresh = state.begin_refresh();
        let refreshed: Vec<_> = (0..3).map(|i| sample(&format!("r{i}"), "m")).collect();
        state.complete(&refresh, Outcome::Refreshed(refreshed));

        assert_eq!(state.mode(), Mode::Listing);
        assert_eq!(state.error(), None);
        assert!(state.cursor().has_next_page, "full page is optimistic");

        let reconcile = refresh.reconcile(3);
        assert!(state.complete(&reconcile, Outcome::Page(page_of(3, 1, false))));
        assert!(!state.cursor().has_next_page);
        assert_eq!(state.visible_commits()[0].sha, "p1-0");
    }

    #[test]
    fn failed_reconcile_keeps_refreshed_list() {
        let mut state = ready(false);
        let refresh = state.begin_refresh();
        state.complete(&refresh, Outcome::Refreshed(vec![sample("r0", "m")]));

        state.complete(&refresh.reconcile(3), Outcome::Failed("offline".to_string()));
        assert_eq!(state.error(), None);
        assert_eq!(state.visible_commits().len(), 1);
    }

    #[test]
    fn load_more_between_refresh_and_reconcile_keeps_its_page() {
        let mut state = ready(false);
        let refresh = state.begin_refresh();
        let refreshed: Vec<_> = (0..3).map(|i| sample(&format!("r{i}"), "m")).collect();
        state.complete(&refresh, Outcome::Refreshed(refreshed));

        let more = state.begin_load_more().unwrap();
        assert!(state.complete(&more, Outcome::Page(page_of(2, 2, false))));

        assert!(state.complete(&refresh.reconcile(3), Outcome::Page(page_of(3, 1, true))));
        assert_eq!(state.visible_commits().len(), 5);
        assert_eq!(state.visible_commits()[0].sha, "r0");
        assert_eq!(state.cursor().page, 2);
        assert!(!state.cursor().has_next_page);
    }

    #[test]
    fn mismatched_outcomes_are_dropped() {
        let mut state = ready(true);
        let more = state.begin_load_more().unwrap();
        assert!(!state.complete(&more, Outcome::Refreshed(vec![sample("x", "m")])));
        assert_eq!(state.loaded_commits().len(), 3);
        assert_eq!(state.cursor().page, 1);
        assert!(!state.is_loading_more());

        let refresh = state.begin_refresh();
        assert!(!state.complete(&refresh, Outcome::Page(page_of(1, 1, false))));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.loaded_commits().len(), 3);

        let mut fresh = ViewState::new(3);
        let mount = fresh.begin_mount();
        assert!(!fresh.complete(&mount, Outcome::Refreshed(Vec::new())));
        assert_eq!(fresh.phase(), Phase::Ready);
        assert!(fresh.loaded_commits().is_empty());
    }
}
