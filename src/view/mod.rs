//! Client view: owns the displayed commit list, pagination cursor, search
//! mode and error, and drives a `CommitsApi` in response to user actions.
//!
//! The state lock is never held across a request. Overlapping actions are
//! resolved by the generation check in `ViewState::complete`.

pub mod api;
pub mod render;
pub mod state;

use tokio::sync::Mutex;

pub use api::{CommitsApi, HttpCommitsApi, LocalCommitsApi};
pub use state::{Outcome, Request, Ticket, ViewState};

pub struct ClientView<A> {
    api: A,
    state: Mutex<ViewState>,
    per_page: u32,
}

impl<A: CommitsApi> ClientView<A> {
    pub fn new(api: A, per_page: u32) -> Self {
        Self {
            api,
            state: Mutex::new(ViewState::new(per_page)),
            per_page,
        }
    }

    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub async fn mount(&self) {
        let ticket = self.state.lock().await.begin_mount();
        self.run(ticket).await;
    }

    /// Show the refreshed page right away, then re-read page 1 through the
    /// listing endpoint to settle `has_next_page`.
    pub async fn refresh(&self) {
        let ticket = self.state.lock().await.begin_refresh();
        let outcome = self.fetch(&ticket.request).await;
        let refreshed = matches!(outcome, Outcome::Refreshed(_));

        let applied = self.state.lock().await.complete(&ticket, outcome);
        if applied && refreshed {
            self.run(ticket.reconcile(self.per_page)).await;
        }
    }

    pub async fn submit_search(&self, query: &str) {
        let ticket = self.state.lock().await.begin_search(query);
        self.run(ticket).await;
    }

    /// Returns `false` when there was nothing to load.
    pub async fn load_more(&self) -> bool {
        let Some(ticket) = self.state.lock().await.begin_load_more() else {
            return false;
        };
        self.run(ticket).await
    }

    async fn run(&self, ticket: Ticket) -> bool {
        let outcome = self.fetch(&ticket.request).await;
        self.state.lock().await.complete(&ticket, outcome)
    }

    async fn fetch(&self, request: &Request) -> Outcome {
        match request {
            Request::List(params) => self
                .api
                .fetch_commits(*params)
                .await
                .map_or_else(Outcome::Failed, Outcome::Page),
            Request::Search { query, params } => self
                .api
                .search_commits(query, *params)
                .await
                .map_or_else(Outcome::Failed, Outcome::Page),
            Request::Refresh => {
                let result = self.api.refresh().await;
                match result.error {
                    Some(error) => Outcome::Failed(error),
                    None => Outcome::Refreshed(result.commits),
                }
            }
        }
    }
}
