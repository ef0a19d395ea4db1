use reqwest::StatusCode;
use thiserror::Error;

/// Token acquisition errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token endpoint answered with a non-success status
    #[error("token request failed: {status} - {body}")]
    TokenExchangeFailed { status: StatusCode, body: String },

    #[error("token request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("parse token response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token request cancelled")]
    Cancelled,
}
