use reqwest::StatusCode;
use thiserror::Error;

/// The outcome of the final attempt before the retry budget ran out
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("server responded {status}")]
    Status { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
}

/// Transport errors
#[derive(Debug, Error)]
pub enum TransportError {
    /// Every attempt failed with a retryable error
    #[error("request failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: usize,
        #[source]
        last: AttemptFailure,
    },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("request body cannot be cloned; buffer the body to enable retries")]
    UncloneableBody,

    #[error("request cancelled")]
    Cancelled,
}
