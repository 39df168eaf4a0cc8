//! Search state management
//!
//! Owns the externally observable search state (keyword, results, searching
//! flag) together with the request lifecycle internals: the debounce gate,
//! the response cache, the worker channels, and the single active request
//! token used to discard superseded completions.

use std::sync::mpsc::{Receiver, Sender};

use tokio_util::sync::CancellationToken;

use super::cache::{SearchCache, cache_key};
use super::debouncer::Debouncer;

/// Result-count caps the limit selector cycles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultLimit {
    Two,
    Four,
    Five,
    Ten,
}

impl ResultLimit {
    /// All selectable limits, in cycling order
    pub const ALL: [ResultLimit; 4] = [
        ResultLimit::Two,
        ResultLimit::Four,
        ResultLimit::Five,
        ResultLimit::Ten,
    ];

    pub fn value(self) -> u8 {
        match self {
            ResultLimit::Two => 2,
            ResultLimit::Four => 4,
            ResultLimit::Five => 5,
            ResultLimit::Ten => 10,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            2 => Some(ResultLimit::Two),
            4 => Some(ResultLimit::Four),
            5 => Some(ResultLimit::Five),
            10 => Some(ResultLimit::Ten),
            _ => None,
        }
    }

    /// Next limit in the selector cycle, wrapping around
    pub fn next(self) -> Self {
        match self {
            ResultLimit::Two => ResultLimit::Four,
            ResultLimit::Four => ResultLimit::Five,
            ResultLimit::Five => ResultLimit::Ten,
            ResultLimit::Ten => ResultLimit::Two,
        }
    }
}

impl Default for ResultLimit {
    fn default() -> Self {
        ResultLimit::Five
    }
}

impl std::fmt::Display for ResultLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Request messages sent to the search worker thread
#[derive(Debug)]
pub enum SearchRequest {
    /// Query the endpoint for a keyword/limit pair
    Query {
        keyword: String,
        limit: u8,
        /// Unique ID for this request, used to filter stale responses
        request_id: u64,
        /// Token the transport observes to abandon superseded requests
        cancel_token: CancellationToken,
    },
}

/// Response messages received from the search worker thread
#[derive(Debug)]
pub enum SearchResponse {
    /// The endpoint answered with a result list
    Results {
        request_id: u64,
        results: Vec<String>,
    },
    /// The request failed (network, HTTP status, or body parse)
    Error { request_id: u64, message: String },
    /// The request observed its cancellation token
    Cancelled { request_id: u64 },
}

/// The single request currently allowed to mutate search state on completion
#[derive(Debug)]
pub struct InFlightRequest {
    pub id: u64,
    pub token: CancellationToken,
    /// Key the result will be stored under if the request completes
    pub cache_key: String,
}

/// Search widget state
pub struct SearchState {
    /// Keyword as last seen by the controller
    pub keyword: String,
    /// Results of the most recent completed, non-superseded search
    pub results: Vec<String>,
    /// True only while a non-superseded request is outstanding
    pub is_searching: bool,
    /// Active result-count cap; part of the cache key
    pub limit: ResultLimit,
    /// User-visible failure message from the last completed request, if any
    pub error: Option<String>,
    /// Debounce gate re-armed on every keyword/limit change
    pub debouncer: Debouncer,
    /// Memoized responses for the lifetime of the widget
    pub cache: SearchCache,
    /// Results-list cursor, when the results pane has focus
    pub selected: Option<usize>,
    /// Channel to send requests to the worker thread
    pub request_tx: Option<Sender<SearchRequest>>,
    /// Channel to receive responses from the worker thread
    pub response_rx: Option<Receiver<SearchResponse>>,
    /// Monotonic counter; each issued request gets the next ID
    request_id: u64,
    /// The at-most-one uncancelled request
    in_flight: Option<InFlightRequest>,
}

impl SearchState {
    pub fn new(limit: ResultLimit, debounce_ms: u64) -> Self {
        Self {
            keyword: String::new(),
            results: Vec::new(),
            is_searching: false,
            limit,
            error: None,
            debouncer: Debouncer::new(debounce_ms),
            cache: SearchCache::new(),
            selected: None,
            request_tx: None,
            response_rx: None,
            request_id: 0,
            in_flight: None,
        }
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        request_tx: Sender<SearchRequest>,
        response_rx: Receiver<SearchResponse>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    /// ID of the most recently issued request
    pub fn current_request_id(&self) -> u64 {
        self.request_id
    }

    pub fn in_flight(&self) -> Option<&InFlightRequest> {
        self.in_flight.as_ref()
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Cancel the active request token, if any.
    ///
    /// The superseded operation's completion is discarded by the response
    /// filter regardless; cancelling additionally tells the transport to
    /// abandon the HTTP call. Returns true if a request was cancelled.
    pub fn cancel_in_flight(&mut self) -> bool {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.token.cancel();
            log::debug!("cancelled request {}", in_flight.id);
            return true;
        }
        false
    }

    /// Issue a request for the current keyword/limit pair through the worker
    /// channel.
    ///
    /// The caller must have invalidated any previous token first
    /// (`cancel_in_flight`); the new token is created and recorded in the
    /// same event-loop step as the send, so two tokens are never active at
    /// once. Returns false if no worker channel is connected.
    pub fn begin_request(&mut self, keyword: &str) -> bool {
        let Some(ref tx) = self.request_tx else {
            return false;
        };

        self.request_id = self.request_id.wrapping_add(1);
        let token = CancellationToken::new();
        let request = SearchRequest::Query {
            keyword: keyword.to_string(),
            limit: self.limit.value(),
            request_id: self.request_id,
            cancel_token: token.clone(),
        };

        if tx.send(request).is_err() {
            log::error!("search worker channel closed, dropping request");
            return false;
        }

        self.in_flight = Some(InFlightRequest {
            id: self.request_id,
            token,
            cache_key: cache_key(keyword, self.limit),
        });
        self.is_searching = true;
        self.error = None;
        true
    }

    /// Take the in-flight record, but only if `request_id` still names it.
    ///
    /// Completions of superseded requests fail this check and must be
    /// dropped by the caller.
    pub fn complete_if_current(&mut self, request_id: u64) -> Option<InFlightRequest> {
        if self.in_flight.as_ref().map(|r| r.id) == Some(request_id) {
            return self.in_flight.take();
        }
        None
    }

    /// Apply a completed result set and clear the searching flag
    pub fn apply_results(&mut self, results: Vec<String>) {
        self.results = results;
        self.selected = None;
        self.is_searching = false;
        self.error = None;
    }

    /// Record a failed request: the searching flag resets, displayed results
    /// are left untouched
    pub fn apply_error(&mut self, message: String) {
        self.error = Some(message);
        self.is_searching = false;
    }

    /// Terminal empty-keyword state: no results, no pending or in-flight work
    pub fn clear(&mut self) {
        self.cancel_in_flight();
        self.debouncer.cancel();
        self.results.clear();
        self.selected = None;
        self.is_searching = false;
        self.error = None;
    }

    /// Teardown: cancel all outstanding work and drop the channels so the
    /// worker loop exits. No timer or request callback outlives the widget.
    pub fn shutdown(&mut self) {
        self.cancel_in_flight();
        self.debouncer.cancel();
        self.request_tx = None;
        self.response_rx = None;
        self.is_searching = false;
    }

    /// Cycle the limit selector to its next value
    pub fn cycle_limit(&mut self) {
        self.limit = self.limit.next();
    }

    // Results-list cursor handling

    pub fn select_first(&mut self) {
        if !self.results.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_next(&mut self) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() - 1;
        self.selected = Some(match self.selected {
            Some(i) if i < last => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn select_previous(&mut self) {
        if self.results.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn selected_result(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.results.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
#[path = "search_state_tests.rs"]
mod search_state_tests;
