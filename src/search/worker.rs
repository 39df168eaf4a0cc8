//! Search worker thread
//!
//! Runs search requests off the UI thread. Receives requests via channel,
//! performs the HTTP call on a current-thread tokio runtime with
//! cancellation support, and reports completions back to the main thread.
//!
//! Non-cancellation failures are reported with the generic user-facing
//! message; the detailed cause only goes to the diagnostic log.

use std::sync::mpsc::{Receiver, Sender};

use tokio_util::sync::CancellationToken;

use super::client::{SearchClient, SearchError};
use super::search_state::{SearchRequest, SearchResponse};

/// Message shown for any non-cancellation failure
pub const SEARCH_FAILED: &str = "Search failed";

/// Spawn the search worker thread.
///
/// Creates a background thread with a tokio runtime that:
/// 1. Listens for requests on the request channel
/// 2. Runs the HTTP call with cancellation support
/// 3. Sends the completion back via the response channel
pub fn spawn_worker(
    client: SearchClient,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchResponse>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("failed to create search worker runtime: {e}");
                return;
            }
        };

        runtime.block_on(worker_loop(client, request_rx, response_tx));
    });
}

/// Main worker loop - processes requests until the channel is closed.
///
/// Blocking `recv()` is fine here since this is a dedicated thread.
async fn worker_loop(
    client: SearchClient,
    request_rx: Receiver<SearchRequest>,
    response_tx: Sender<SearchResponse>,
) {
    while let Ok(request) = request_rx.recv() {
        match request {
            SearchRequest::Query {
                keyword,
                limit,
                request_id,
                cancel_token,
            } => {
                handle_query(
                    &client,
                    &keyword,
                    limit,
                    request_id,
                    cancel_token,
                    &response_tx,
                )
                .await;
            }
        }
    }
}

/// Run a single query with cancellation support
async fn handle_query(
    client: &SearchClient,
    keyword: &str,
    limit: u8,
    request_id: u64,
    cancel_token: CancellationToken,
    response_tx: &Sender<SearchResponse>,
) {
    // A request superseded while still queued never reaches the wire
    if cancel_token.is_cancelled() {
        let _ = response_tx.send(SearchResponse::Cancelled { request_id });
        return;
    }

    match client
        .fetch_with_cancel(keyword, limit, request_id, &cancel_token)
        .await
    {
        Ok(results) => {
            let _ = response_tx.send(SearchResponse::Results {
                request_id,
                results,
            });
        }
        Err(SearchError::Cancelled) => {
            let _ = response_tx.send(SearchResponse::Cancelled { request_id });
        }
        Err(e) => {
            log::error!("search request {request_id} failed: {e}");
            let _ = response_tx.send(SearchResponse::Error {
                request_id,
                message: SEARCH_FAILED.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
