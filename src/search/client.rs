//! Search endpoint client
//!
//! Issues the GET request for a keyword/limit pair and parses the JSON
//! array-of-strings body. Cancellation is raced against both suspension
//! points with `tokio::select!` so a superseded request abandons the wire
//! promptly instead of delivering a result nobody wants.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while talking to the search endpoint
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Transport-level failure (DNS, connect, TLS, mid-body disconnect)
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-2xx status
    #[error("Endpoint returned HTTP {code}")]
    Api { code: u16 },

    /// Response body was not a JSON array of strings
    #[error("Malformed response body: {0}")]
    Parse(String),

    /// Request observed its cancellation token
    #[error("Request cancelled")]
    Cancelled,
}

/// HTTP client for the autocomplete endpoint
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch results for a keyword/limit pair with cancellation support.
    ///
    /// The keyword travels raw; the query builder applies standard URL
    /// encoding. `biased` keeps the cancellation arm ahead of transport
    /// progress.
    pub async fn fetch_with_cancel(
        &self,
        keyword: &str,
        limit: u8,
        request_id: u64,
        cancel_token: &CancellationToken,
    ) -> Result<Vec<String>, SearchError> {
        if cancel_token.is_cancelled() {
            return Err(SearchError::Cancelled);
        }

        let limit_param = limit.to_string();
        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("query", keyword), ("limit", limit_param.as_str())]);

        let response = tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log::debug!("request {request_id} cancelled before the endpoint answered");
                return Err(SearchError::Cancelled);
            }
            response = request.send() => {
                response.map_err(|e| SearchError::Network(e.to_string()))?
            }
        };

        if !response.status().is_success() {
            return Err(SearchError::Api {
                code: response.status().as_u16(),
            });
        }

        let body = tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log::debug!("request {request_id} cancelled while reading the body");
                return Err(SearchError::Cancelled);
            }
            body = response.text() => {
                body.map_err(|e| SearchError::Network(e.to_string()))?
            }
        };

        serde_json::from_str(&body).map_err(|e| SearchError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to run async tests with a tokio runtime
    fn run_async<F: std::future::Future>(f: F) -> F::Output {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");
        rt.block_on(f)
    }

    #[test]
    fn test_endpoint_accessor() {
        let client = SearchClient::new("http://localhost:8080/search".to_string());
        assert_eq!(client.endpoint(), "http://localhost:8080/search");
    }

    #[test]
    fn test_pre_cancelled_token_short_circuits() {
        // An unroutable endpoint proves the wire is never touched
        let client = SearchClient::new("http://127.0.0.1:9/search".to_string());
        let token = CancellationToken::new();
        token.cancel();

        let result = run_async(client.fetch_with_cancel("cat", 5, 1, &token));
        assert!(matches!(result, Err(SearchError::Cancelled)));
    }

    #[test]
    fn test_connection_failure_is_network_error() {
        // Discard port: nothing listens there, connect is refused quickly
        let client = SearchClient::new("http://127.0.0.1:9/search".to_string());
        let token = CancellationToken::new();

        let result = run_async(client.fetch_with_cancel("cat", 5, 1, &token));
        assert!(matches!(result, Err(SearchError::Network(_))));
    }

    #[test]
    fn test_error_display_messages() {
        assert_eq!(
            SearchError::Api { code: 503 }.to_string(),
            "Endpoint returned HTTP 503"
        );
        assert_eq!(SearchError::Cancelled.to_string(), "Request cancelled");
        assert!(
            SearchError::Parse("expected value".to_string())
                .to_string()
                .starts_with("Malformed response body")
        );
    }

    #[test]
    fn test_body_must_be_array_of_strings() {
        let parsed: Result<Vec<String>, _> = serde_json::from_str(r#"["catalog","category"]"#);
        assert_eq!(
            parsed.unwrap(),
            ["catalog".to_string(), "category".to_string()]
        );

        let not_strings: Result<Vec<String>, _> = serde_json::from_str(r#"[1,2,3]"#);
        assert!(not_strings.is_err());

        let not_array: Result<Vec<String>, _> = serde_json::from_str(r#"{"results":[]}"#);
        assert!(not_array.is_err());
    }
}
