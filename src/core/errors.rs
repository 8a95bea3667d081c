//! Market data error types
//!
//! Every failure of a price fetch is a `FetchError`. The screen collapses
//! all variants into a single audit line; the detail only goes to tracing.

use thiserror::Error;

/// Failure modes of a market snapshot fetch
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request could not be sent or the body could not be read
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Response carried a missing or empty pair list
    #[error("Response contained no trading pairs")]
    NoPairs,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;
