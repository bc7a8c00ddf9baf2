//! Error types for the release feed client.

use thiserror::Error;

/// Errors that can occur when reading the release feed.
#[derive(Error, Debug)]
pub enum FeedClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Feed returned an error response
    #[error("Feed error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid feed URL
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the feed document
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for feed client operations.
pub type Result<T> = std::result::Result<T, FeedClientError>;

impl From<FeedClientError> for radio_core::RadioError {
    fn from(err: FeedClientError) -> Self {
        radio_core::RadioError::Feed(err.to_string())
    }
}
