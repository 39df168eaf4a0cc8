//! Remote search module
//!
//! Debounces keyword input, issues cancellable requests to the search
//! endpoint through a background worker thread, and memoizes completed
//! responses. Only the most recent non-superseded request may ever update
//! the observable search state; everything older is discarded.

pub mod cache;
pub mod client;
pub mod debouncer;
pub mod search_events;
pub mod search_render;
mod search_state;
pub mod worker;

pub use search_state::{InFlightRequest, ResultLimit, SearchRequest, SearchResponse, SearchState};
