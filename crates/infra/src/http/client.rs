use std::time::Duration;

use ponto_domain::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use rand::Rng;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::{AttemptFailure, TransportError};
use crate::errors::conversions::describe_reqwest_error;

/// HTTP client with built-in retry and timeout support.
///
/// Network errors, 5xx and 429 responses are retried with exponential
/// backoff plus jitter. Other responses are returned untouched. Retry
/// classification ignores the request method, so a POST is retried like a
/// GET.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    ///
    /// With a budget of one attempt every response is returned as is. With a
    /// larger budget, a retryable status on the last attempt becomes
    /// [`TransportError::Exhausted`].
    pub async fn send(
        &self,
        builder: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, TransportError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request =
                builder.try_clone().ok_or(TransportError::UncloneableBody)?.build()?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                outcome = self.client.execute(request) => outcome,
            };
            let is_last = attempt == attempts;

            match outcome {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if !should_retry_status(status) || attempts == 1 {
                        return Ok(response);
                    }
                    if is_last {
                        let body = response.text().await.unwrap_or_default();
                        warn!(attempts, %method, %url, %status, "HTTP retries exhausted");
                        return Err(TransportError::Exhausted {
                            attempts,
                            last: AttemptFailure::Status { status, body },
                        });
                    }
                }
                Err(err) => {
                    debug!(
                        attempt,
                        %method,
                        %url,
                        kind = describe_reqwest_error(&err),
                        error = %err,
                        "HTTP request failed"
                    );

                    if !should_retry_error(&err) || attempts == 1 {
                        return Err(TransportError::Request(err));
                    }
                    if is_last {
                        warn!(attempts, %method, %url, error = %err, "HTTP retries exhausted");
                        return Err(TransportError::Exhausted {
                            attempts,
                            last: AttemptFailure::Network(err),
                        });
                    }
                }
            }

            let delay = jittered(self.backoff_delay(attempt));
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let multiplier = 1u32 << shift;
        self.base_backoff.saturating_mul(multiplier)
    }
}

/// Add up to 50% random delay on top of `delay`
fn jittered(delay: Duration) -> Duration {
    let max_jitter = (delay.as_millis() / 2) as u64;
    if max_jitter == 0 {
        return delay;
    }
    delay + Duration::from_millis(rand::thread_rng().gen_range(0..=max_jitter))
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_BASE_BACKOFF_MS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Single attempt, no retries
    pub fn no_retry(self, no_retry: bool) -> Self {
        if no_retry {
            self.max_attempts(1)
        } else {
            self
        }
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, TransportError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout);

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        Ok(HttpClient {
            client: builder.build()?,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_request() || err.is_connect()
}
