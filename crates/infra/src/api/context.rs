//! Per-invocation client settings

use std::time::Duration;

use ponto_domain::constants::{DEFAULT_PROFILE, DEFAULT_REQUEST_TIMEOUT_SECS};
use tokio_util::sync::CancellationToken;

/// Settings a caller supplies for one invocation
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub profile: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Make exactly one attempt per request
    pub no_retry: bool,
    pub cancel: CancellationToken,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            no_retry: false,
            cancel: CancellationToken::new(),
        }
    }
}

impl ClientContext {
    pub fn new(profile: impl Into<String>) -> Self {
        Self { profile: profile.into(), ..Self::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_no_retry(mut self, no_retry: bool) -> Self {
        self.no_retry = no_retry;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}
