use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeaheadError {
    #[error("Invalid search endpoint '{url}': {reason}\n\nPass a full URL, e.g. http://localhost:8080/search")]
    InvalidEndpoint { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
