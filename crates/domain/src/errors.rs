//! Error types exposed to the presentation layer

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error returned by the Ponto API.
///
/// Built from the first entry of a JSON:API `errors` array. When the body does
/// not have that shape, `code` is empty and `message` carries the raw body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub status_code: u16,
    pub code: String,
    pub message: String,
}

/// Categories of API errors, keyed on the HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 - credentials rejected, re-authenticate
    Authentication,
    /// 403 - integration lacks the permission
    Permission,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// 5xx
    Server,
    /// Any other status
    Client,
}

impl ApiError {
    pub fn new(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { status_code, code: code.into(), message: message.into() }
    }

    /// Classify this error by status code
    pub fn category(&self) -> ApiErrorCategory {
        match self.status_code {
            401 => ApiErrorCategory::Authentication,
            403 => ApiErrorCategory::Permission,
            404 => ApiErrorCategory::NotFound,
            429 => ApiErrorCategory::RateLimit,
            500..=599 => ApiErrorCategory::Server,
            _ => ApiErrorCategory::Client,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)
        } else if !self.code.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "API error: {}", self.status_code)
        }
    }
}

impl std::error::Error for ApiError {}

/// Failure to normalize a date filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid relative date: {0}")]
    InvalidRelative(String),

    #[error("unsupported date format: {0} (use YYYY-MM-DD or -Nd)")]
    Unsupported(String),
}

/// Unknown keyring backend name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid keyring backend: {0:?}")]
pub struct InvalidBackend(pub String);
