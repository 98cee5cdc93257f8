//! Error types for feed streaming and source-directory access
//!
//! A single error enum covers the failure modes of the crate: transport
//! problems, unexpected HTTP statuses, malformed feed rows, configuration
//! mistakes, and plain I/O. Variants carry rendered messages rather than the
//! source errors so values stay `Clone` and cheap to move through streams.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Unexpected HTTP status {code} from {url}")]
    Status { code: u16, url: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Http(err.to_string())
    }
}

impl From<std::io::Error> for FeedError {
    fn from(err: std::io::Error) -> Self {
        FeedError::Io(err.to_string())
    }
}
