//! Query Controller
//!
//! Maps a changing search text to at most one current request against the
//! thesaurus transport, and owns the [`SearchState`] the display host reads.
//!
//! Every [`QueryController::submit`] mints a new [`RequestToken`]. A request's
//! outcome is applied only if its token is still the active one when the
//! completion is drained. Aborting the superseded task is best effort on top
//! of that check, so transports that ignore cancellation stay correct.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use super::client::ThesaurusTransport;
use super::error::{Result, ThesaurusError};
use super::models::{Entry, SearchState};
use super::normalize::normalize;

/// Title of the notification raised for a failed search.
pub const SEARCH_FAILURE_TITLE: &str = "Could not perform search";

// ============================================================================
// Tokens & Completions
// ============================================================================

/// Generation marker for one submit. Later tokens supersede earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// The finished work of one request, tagged with the token that issued it.
#[derive(Debug)]
pub struct SearchCompletion {
    token: RequestToken,
    query: String,
    outcome: Result<Vec<Entry>>,
}

impl SearchCompletion {
    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A user-visible failure: `(title, message)` for the notification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFailure {
    pub title: String,
    pub message: String,
}

impl SearchFailure {
    fn from_error(error: &ThesaurusError) -> Self {
        Self {
            title: SEARCH_FAILURE_TITLE.to_string(),
            message: error.to_string(),
        }
    }
}

/// What applying a completion did to the search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results replaced, loading cleared.
    Applied { count: usize },
    /// Superseded request; nothing changed.
    Stale,
    /// The active request was aborted; loading cleared, nothing reported.
    Cancelled,
    /// Loading cleared, results kept, nothing reported.
    TimedOut,
    /// Loading cleared, results kept, failure to be reported.
    Failed(SearchFailure),
}

// ============================================================================
// Controller
// ============================================================================

pub struct QueryController {
    transport: Arc<dyn ThesaurusTransport>,
    state: SearchState,
    query: String,
    last_generation: u64,
    active: RequestToken,
    in_flight: Option<JoinHandle<()>>,
    completion_tx: mpsc::UnboundedSender<SearchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<SearchCompletion>,
}

impl QueryController {
    /// Create a controller in the session-start state (`[]`, loading).
    pub fn new(transport: Arc<dyn ThesaurusTransport>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            state: SearchState::new(),
            query: String::new(),
            last_generation: 0,
            active: RequestToken(0),
            in_flight: None,
            completion_tx,
            completion_rx,
        }
    }

    /// Create a controller and run the initial empty submit.
    pub fn start(transport: Arc<dyn ThesaurusTransport>) -> Self {
        let mut controller = Self::new(transport);
        controller.submit("");
        controller
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The text of the most recent submit.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_token(&self) -> RequestToken {
        self.active
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token == self.active
    }

    /// Request results for `text`, superseding any outstanding request.
    ///
    /// Previous results stay visible until the new ones arrive. An empty
    /// text resolves immediately to no results without touching the network.
    /// Must be called inside a tokio runtime unless `text` is empty.
    pub fn submit(&mut self, text: impl Into<String>) -> RequestToken {
        let text = text.into();
        self.cancel_in_flight();

        self.last_generation = self.last_generation.wrapping_add(1);
        let token = RequestToken(self.last_generation);
        self.active = token;
        self.query = text.clone();
        self.state.is_loading = true;

        if text.is_empty() {
            self.state.results.clear();
            self.state.is_loading = false;
            return token;
        }

        let transport = Arc::clone(&self.transport);
        let tx = self.completion_tx.clone();
        let span = tracing::debug_span!("thesaurus_request", generation = token.0, query = %text);

        self.in_flight = Some(tokio::spawn(
            async move {
                let outcome = transport
                    .fetch(&text)
                    .await
                    .and_then(|payload| normalize(payload, &text));
                // Receiver only closes when the controller is gone.
                let _ = tx.send(SearchCompletion {
                    token,
                    query: text,
                    outcome,
                });
            }
            .instrument(span),
        ));

        token
    }

    /// Apply one completion, honouring the active-token rule.
    pub fn apply(&mut self, completion: SearchCompletion) -> SearchOutcome {
        let SearchCompletion {
            token,
            query,
            outcome,
        } = completion;

        if token != self.active {
            log::debug!(
                "Discarding stale result for '{}' (request {} superseded by {})",
                query,
                token.0,
                self.active.0
            );
            return SearchOutcome::Stale;
        }

        self.in_flight = None;

        match outcome {
            Ok(entries) => {
                let count = entries.len();
                log::debug!("Search for '{}' returned {} entries", query, count);
                self.state.results = entries;
                self.state.is_loading = false;
                SearchOutcome::Applied { count }
            }
            Err(ThesaurusError::Cancelled) => {
                log::debug!("Search for '{}' was cancelled", query);
                self.state.is_loading = false;
                SearchOutcome::Cancelled
            }
            Err(ThesaurusError::TimedOut) => {
                log::info!("Search for '{}' timed out", query);
                self.state.is_loading = false;
                SearchOutcome::TimedOut
            }
            Err(e) => {
                log::warn!("Search for '{}' failed: {}", query, e);
                self.state.is_loading = false;
                SearchOutcome::Failed(SearchFailure::from_error(&e))
            }
        }
    }

    /// Drain every completion that has arrived. Call from the host's tick.
    pub fn poll(&mut self) -> Vec<SearchOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Wait for the next completion without applying it.
    pub async fn next_completion(&mut self) -> Option<SearchCompletion> {
        self.completion_rx.recv().await
    }

    /// Wait until the active request has been applied.
    ///
    /// Returns `None` when nothing is outstanding.
    pub async fn settle(&mut self) -> Option<SearchOutcome> {
        while self.state.is_loading && self.in_flight.is_some() {
            let completion = self.completion_rx.recv().await?;
            match self.apply(completion) {
                SearchOutcome::Stale => continue,
                outcome => return Some(outcome),
            }
        }
        None
    }

    /// Abort any outstanding request. Used at session teardown.
    pub fn shutdown(&mut self) {
        self.cancel_in_flight();
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                log::debug!("Aborting in-flight request {} for '{}'", self.active.0, self.query);
            }
            handle.abort();
        }
    }
}

impl Drop for QueryController {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
