//! Resource client errors

use ponto_domain::{ApiError, DateError};
use thiserror::Error;

use crate::auth::TokenError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::http::TransportError;

/// Errors surfaced by [`PontoClient`](super::PontoClient) operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with an error status
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("get access token: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("invalid date filter: {0}")]
    InvalidDate(#[from] DateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// The structured API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the caller's cancellation token stopped the operation
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Cancelled
                | Self::Transport(TransportError::Cancelled)
                | Self::Token(TokenError::Cancelled)
        )
    }

    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode { context: context.into(), source }
    }
}
