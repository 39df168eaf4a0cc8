//! Search event orchestration
//!
//! Single entry points for the event loop: input changes re-arm the debounce
//! gate, the commit key bypasses it, a timer fire runs one search attempt
//! (cache check, then request), and the worker response channel is drained
//! with stale completions discarded.

use std::sync::mpsc::TryRecvError;

use super::cache::cache_key;
use super::search_state::{SearchResponse, SearchState};

/// React to a keyword or limit change.
///
/// An empty (trimmed) keyword is a terminal state: displayed results clear,
/// any pending timer and in-flight request are cancelled, and nothing is
/// scheduled. Any other change re-arms the debounce gate.
pub fn handle_input_change(state: &mut SearchState, keyword: &str) {
    state.keyword = keyword.to_string();

    if keyword.trim().is_empty() {
        state.clear();
        return;
    }

    state.debouncer.schedule();
}

/// Commit signal: run the search attempt now, bypassing the debounce delay
pub fn handle_commit(state: &mut SearchState, keyword: &str) {
    state.keyword = keyword.to_string();
    state.debouncer.cancel();

    if keyword.trim().is_empty() {
        state.clear();
        return;
    }

    run_search_attempt(state);
}

/// Debounce window elapsed: run the pending search attempt
pub fn handle_debounce_fire(state: &mut SearchState) {
    state.debouncer.mark_executed();

    if state.keyword.trim().is_empty() {
        state.clear();
        return;
    }

    run_search_attempt(state);
}

/// One search attempt: invalidate any older request, then consult the cache,
/// then go to the network.
///
/// The in-flight token is cancelled before the cache lookup so a superseded
/// request can never complete after a newer attempt, whether that attempt is
/// answered from the cache or from the wire.
fn run_search_attempt(state: &mut SearchState) {
    state.cancel_in_flight();

    let keyword = state.keyword.clone();
    let key = cache_key(&keyword, state.limit);
    if let Some(results) = state.cache.lookup(&key).map(<[String]>::to_vec) {
        log::debug!("cache hit for {key:?}");
        state.apply_results(results);
        return;
    }

    if !state.begin_request(&keyword) {
        log::error!("search worker unavailable, dropping attempt for {key:?}");
        state.is_searching = false;
    }
}

/// Poll the response channel for completed requests.
///
/// Called from the main event loop; uses try_recv() for non-blocking
/// polling. Returns true if any state changed.
pub fn poll_response_channel(state: &mut SearchState) -> bool {
    if state.response_rx.is_none() {
        return false;
    }

    let mut responses = Vec::new();
    let mut disconnected = false;

    if let Some(ref rx) = state.response_rx {
        loop {
            match rx.try_recv() {
                Ok(response) => responses.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
    }

    let mut changed = false;
    for response in responses {
        changed |= process_response(state, response);
    }

    if disconnected && state.is_searching {
        log::error!("search worker disconnected with a request outstanding");
        state.apply_error("Search failed".to_string());
        changed = true;
    }

    changed
}

/// Apply one worker response, discarding anything that is not the current
/// in-flight request.
///
/// Cancellation is expected control flow from supersession: it never mutates
/// state and never counts as a failure. Successful completions populate the
/// cache under the key recorded when the request was issued.
fn process_response(state: &mut SearchState, response: SearchResponse) -> bool {
    match response {
        SearchResponse::Results {
            request_id,
            results,
        } => match state.complete_if_current(request_id) {
            Some(in_flight) => {
                state.cache.store(in_flight.cache_key, results.clone());
                state.apply_results(results);
                true
            }
            None => {
                log::debug!("ignoring stale results from request {request_id}");
                false
            }
        },
        SearchResponse::Error {
            request_id,
            message,
        } => {
            if state.complete_if_current(request_id).is_none() {
                log::debug!("ignoring stale error from request {request_id}");
                return false;
            }
            state.apply_error(message);
            true
        }
        SearchResponse::Cancelled { request_id } => {
            // State was already settled when the token was cancelled
            log::debug!("request {request_id} confirmed cancelled");
            false
        }
    }
}

/// Selection hook: hand the picked result to observers.
///
/// Logs the pick and returns the owned string for the caller to act on
/// (notification, final stdout output).
pub fn select_search_result(state: &SearchState) -> Option<String> {
    let result = state.selected_result()?.to_string();
    log::info!("selected search result: {result}");
    Some(result)
}

#[cfg(test)]
#[path = "search_events_tests.rs"]
mod search_events_tests;
