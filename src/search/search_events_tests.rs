//! Tests for the search orchestrator
//!
//! Responses are injected straight into the worker channels so every
//! lifecycle transition can be driven deterministically from the test.

use super::*;
use crate::search::search_state::SearchRequest;
use crate::search::{ResultLimit, SearchState};
use proptest::prelude::*;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const TEST_DEBOUNCE_MS: u64 = 30;

struct Harness {
    state: SearchState,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchResponse>,
}

fn harness() -> Harness {
    harness_with_limit(ResultLimit::Five)
}

fn harness_with_limit(limit: ResultLimit) -> Harness {
    let mut state = SearchState::new(limit, TEST_DEBOUNCE_MS);
    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    state.set_channels(request_tx, response_rx);
    Harness {
        state,
        request_rx,
        response_tx,
    }
}

impl Harness {
    /// Pull the next issued request, panicking with context if none was sent
    fn next_request(&self) -> (String, u8, u64) {
        match self.request_rx.try_recv().expect("a request should be issued") {
            SearchRequest::Query {
                keyword,
                limit,
                request_id,
                ..
            } => (keyword, limit, request_id),
        }
    }

    fn assert_no_request(&self) {
        assert!(
            self.request_rx.try_recv().is_err(),
            "no request should be issued"
        );
    }

    fn respond_results(&self, request_id: u64, results: &[&str]) {
        self.response_tx
            .send(SearchResponse::Results {
                request_id,
                results: results.iter().map(|s| s.to_string()).collect(),
            })
            .unwrap();
    }
}

// =========================================================================
// Debounce gate
// =========================================================================

#[test]
fn test_rapid_typing_issues_single_request_for_final_keyword() {
    let mut h = harness();

    handle_input_change(&mut h.state, "c");
    handle_input_change(&mut h.state, "ca");
    handle_input_change(&mut h.state, "cat");

    // Still within the window: nothing on the wire yet
    h.assert_no_request();
    assert!(!h.state.debouncer.is_ready());

    thread::sleep(Duration::from_millis(TEST_DEBOUNCE_MS + 10));
    assert!(h.state.debouncer.is_ready());
    handle_debounce_fire(&mut h.state);

    let (keyword, limit, _) = h.next_request();
    assert_eq!(keyword, "cat");
    assert_eq!(limit, 5);
    h.assert_no_request();
    assert!(h.state.is_searching);
}

#[test]
fn test_limit_change_rearms_debounce_and_requests_new_limit() {
    let mut h = harness_with_limit(ResultLimit::Two);

    handle_input_change(&mut h.state, "cat");
    h.state.cycle_limit(); // 2 -> 4
    handle_input_change(&mut h.state, "cat");

    thread::sleep(Duration::from_millis(TEST_DEBOUNCE_MS + 10));
    handle_debounce_fire(&mut h.state);

    // A single request fires, carrying the final limit
    let (keyword, limit, _) = h.next_request();
    assert_eq!(keyword, "cat");
    assert_eq!(limit, 4);
    assert_eq!(h.state.in_flight().unwrap().cache_key, "cat|limit:4");
    h.assert_no_request();
}

#[test]
fn test_commit_bypasses_debounce() {
    let mut h = harness();

    handle_input_change(&mut h.state, "cat");
    assert!(h.state.debouncer.has_pending());

    handle_commit(&mut h.state, "cat");

    // Fired synchronously, nothing left pending
    let (keyword, _, _) = h.next_request();
    assert_eq!(keyword, "cat");
    assert!(!h.state.debouncer.has_pending());
    assert!(h.state.is_searching);
}

#[test]
fn test_empty_keyword_is_terminal() {
    let mut h = harness();

    handle_input_change(&mut h.state, "");
    h.assert_no_request();
    assert!(!h.state.debouncer.has_pending());
    assert!(h.state.results.is_empty());
    assert!(!h.state.is_searching);
}

#[test]
fn test_whitespace_keyword_is_terminal() {
    let mut h = harness();

    handle_input_change(&mut h.state, "   ");
    h.assert_no_request();
    assert!(!h.state.debouncer.has_pending());
}

#[test]
fn test_keyword_cleared_while_request_in_flight() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, request_id) = h.next_request();
    let token = h.state.in_flight().unwrap().token.clone();

    handle_input_change(&mut h.state, "");

    assert!(token.is_cancelled());
    assert!(h.state.results.is_empty());
    assert!(!h.state.is_searching);

    // The late completion must not resurrect anything
    h.respond_results(request_id, &["catalog"]);
    assert!(!poll_response_channel(&mut h.state));
    assert!(h.state.results.is_empty());
    assert!(h.state.cache.is_empty());
}

#[test]
fn test_keyword_emptied_before_debounce_fires() {
    let mut h = harness();

    handle_input_change(&mut h.state, "cat");
    handle_input_change(&mut h.state, "");

    thread::sleep(Duration::from_millis(TEST_DEBOUNCE_MS + 10));
    assert!(!h.state.debouncer.is_ready());
    h.assert_no_request();
}

// =========================================================================
// Completion and supersession
// =========================================================================

#[test]
fn test_successful_completion_populates_state_and_cache() {
    let mut h = harness_with_limit(ResultLimit::Two);

    handle_commit(&mut h.state, "cat");
    let (_, limit, request_id) = h.next_request();
    assert_eq!(limit, 2);

    h.respond_results(request_id, &["catalog", "category"]);
    assert!(poll_response_channel(&mut h.state));

    assert_eq!(
        h.state.results,
        ["catalog".to_string(), "category".to_string()]
    );
    assert!(!h.state.is_searching);
    assert_eq!(
        h.state.cache.lookup("cat|limit:2").unwrap(),
        ["catalog".to_string(), "category".to_string()]
    );
}

#[test]
fn test_superseded_completion_is_discarded() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();

    handle_commit(&mut h.state, "dog");
    let (_, _, dog_id) = h.next_request();

    // "cat" answers after being superseded, then "dog" answers
    h.respond_results(cat_id, &["catalog"]);
    h.respond_results(dog_id, &["dogma", "dogwood"]);
    poll_response_channel(&mut h.state);

    assert_eq!(
        h.state.results,
        ["dogma".to_string(), "dogwood".to_string()]
    );
    // Only the terminal request's outcome is cached
    assert!(h.state.cache.lookup("cat|limit:5").is_none());
    assert!(h.state.cache.lookup("dog|limit:5").is_some());
    assert!(!h.state.is_searching);
}

#[test]
fn test_out_of_order_stale_arrival_never_wins() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();

    handle_commit(&mut h.state, "dog");
    let (_, _, dog_id) = h.next_request();

    // "dog" answers first, then "cat" straggles in
    h.respond_results(dog_id, &["dogma"]);
    poll_response_channel(&mut h.state);
    h.respond_results(cat_id, &["catalog"]);
    assert!(!poll_response_channel(&mut h.state));

    assert_eq!(h.state.results, ["dogma".to_string()]);
}

#[test]
fn test_cancelled_response_is_silently_absorbed() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();

    handle_commit(&mut h.state, "dog");
    let (_, _, _dog_id) = h.next_request();

    h.response_tx
        .send(SearchResponse::Cancelled { request_id: cat_id })
        .unwrap();
    assert!(!poll_response_channel(&mut h.state));

    // The superseding request is still the one outstanding
    assert!(h.state.is_searching);
    assert!(h.state.error.is_none());
}

#[test]
fn test_failure_resets_searching_and_keeps_results() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();
    h.respond_results(cat_id, &["catalog"]);
    poll_response_channel(&mut h.state);

    handle_commit(&mut h.state, "dog");
    let (_, _, dog_id) = h.next_request();
    h.response_tx
        .send(SearchResponse::Error {
            request_id: dog_id,
            message: "Search failed".to_string(),
        })
        .unwrap();
    assert!(poll_response_channel(&mut h.state));

    assert_eq!(h.state.error.as_deref(), Some("Search failed"));
    assert!(!h.state.is_searching);
    // Displayed results stay whatever they were
    assert_eq!(h.state.results, ["catalog".to_string()]);
    // Failures never populate the cache
    assert!(h.state.cache.lookup("dog|limit:5").is_none());
}

#[test]
fn test_stale_error_is_discarded() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();

    handle_commit(&mut h.state, "dog");
    let (_, _, _dog_id) = h.next_request();

    h.response_tx
        .send(SearchResponse::Error {
            request_id: cat_id,
            message: "Search failed".to_string(),
        })
        .unwrap();
    assert!(!poll_response_channel(&mut h.state));

    assert!(h.state.error.is_none());
    assert!(h.state.is_searching);
}

#[test]
fn test_worker_disconnect_surfaces_failure() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    h.next_request();

    drop(h.response_tx);
    assert!(poll_response_channel(&mut h.state));

    assert_eq!(h.state.error.as_deref(), Some("Search failed"));
    assert!(!h.state.is_searching);
}

// =========================================================================
// Cache interaction
// =========================================================================

#[test]
fn test_repeat_search_hits_cache_with_zero_network_calls() {
    let mut h = harness();

    handle_commit(&mut h.state, "cat");
    let (_, _, request_id) = h.next_request();
    h.respond_results(request_id, &["catalog", "category"]);
    poll_response_channel(&mut h.state);

    // Same normalized pair, different casing and whitespace
    handle_input_change(&mut h.state, "  CAT ");
    thread::sleep(Duration::from_millis(TEST_DEBOUNCE_MS + 10));
    handle_debounce_fire(&mut h.state);

    h.assert_no_request();
    assert_eq!(
        h.state.results,
        ["catalog".to_string(), "category".to_string()]
    );
    assert!(!h.state.is_searching);
}

#[test]
fn test_cache_hit_invalidates_older_in_flight_request() {
    let mut h = harness();

    // Seed the cache for "cat"
    handle_commit(&mut h.state, "cat");
    let (_, _, cat_id) = h.next_request();
    h.respond_results(cat_id, &["catalog"]);
    poll_response_channel(&mut h.state);

    // Miss for "dog" leaves a request in flight
    handle_commit(&mut h.state, "dog");
    let (_, _, dog_id) = h.next_request();
    let dog_token = h.state.in_flight().unwrap().token.clone();

    // Back to the cached pair before "dog" answers
    handle_commit(&mut h.state, "cat");

    assert!(dog_token.is_cancelled());
    assert!(!h.state.has_in_flight());
    assert_eq!(h.state.results, ["catalog".to_string()]);
    assert!(!h.state.is_searching);

    // The straggler changes nothing
    h.respond_results(dog_id, &["dogma"]);
    assert!(!poll_response_channel(&mut h.state));
    assert_eq!(h.state.results, ["catalog".to_string()]);
}

#[test]
fn test_different_limit_is_a_cache_miss() {
    let mut h = harness_with_limit(ResultLimit::Two);

    handle_commit(&mut h.state, "cat");
    let (_, _, request_id) = h.next_request();
    h.respond_results(request_id, &["catalog", "category"]);
    poll_response_channel(&mut h.state);

    h.state.cycle_limit(); // 2 -> 4
    handle_commit(&mut h.state, "cat");

    let (keyword, limit, _) = h.next_request();
    assert_eq!(keyword, "cat");
    assert_eq!(limit, 4);
    assert_eq!(h.state.in_flight().unwrap().cache_key, "cat|limit:4");
}

// =========================================================================
// Selection hook
// =========================================================================

#[test]
fn test_select_search_result_returns_highlighted_string() {
    let mut h = harness();
    h.state.results = vec!["catalog".to_string(), "category".to_string()];
    h.state.selected = Some(1);

    assert_eq!(
        select_search_result(&h.state),
        Some("category".to_string())
    );
}

#[test]
fn test_select_search_result_without_cursor() {
    let h = harness();
    assert_eq!(select_search_result(&h.state), None);
}

// =========================================================================
// Properties
// =========================================================================

// Property: for any interleaving where request A is superseded by request B,
// A's completion is never visible, whichever order completions arrive in.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_only_terminal_request_outcome_visible(
        first in "[a-z]{1,6}",
        second in "[a-z]{1,6}",
        stale_arrives_first in prop::bool::ANY,
    ) {
        prop_assume!(first != second);

        let mut h = harness();

        handle_commit(&mut h.state, &first);
        let (_, _, first_id) = h.next_request();

        handle_commit(&mut h.state, &second);
        let (_, _, second_id) = h.next_request();

        if stale_arrives_first {
            h.respond_results(first_id, &["stale"]);
            h.respond_results(second_id, &["fresh"]);
        } else {
            h.respond_results(second_id, &["fresh"]);
            h.respond_results(first_id, &["stale"]);
        }
        poll_response_channel(&mut h.state);

        prop_assert_eq!(&h.state.results, &["fresh".to_string()]);
        prop_assert!(!h.state.is_searching);
    }
}

// Property: any number of input changes before the window elapses issues at
// most one request, and it carries the final keyword.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_one_request_per_settled_input(keywords in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let mut h = harness();

        for keyword in &keywords {
            handle_input_change(&mut h.state, keyword);
        }
        h.assert_no_request();

        thread::sleep(Duration::from_millis(TEST_DEBOUNCE_MS + 10));
        handle_debounce_fire(&mut h.state);

        let (keyword, _, _) = h.next_request();
        prop_assert_eq!(&keyword, keywords.last().unwrap());
        h.assert_no_request();
    }
}
