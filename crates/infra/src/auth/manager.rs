//! Client-credentials token manager

use std::time::Duration;

use chrono::Utc;
use ponto_domain::constants::{
    DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, TOKEN_EXPIRY_BUFFER_SECS, TOKEN_PATH,
};
use reqwest::Client as ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::cache::TokenCache;
use super::error::TokenError;
use super::token::Token;

const GRANT_TYPE: [(&str, &str); 1] = [("grant_type", "client_credentials")];

/// Fetches and caches OAuth access tokens
///
/// The token endpoint is called without retries; a failed exchange surfaces
/// the upstream status and body.
#[derive(Debug, Clone)]
pub struct TokenManager {
    http: ReqwestClient,
    token_url: String,
    cache: TokenCache,
    expiry_buffer: chrono::Duration,
}

impl TokenManager {
    /// Manager for the production token endpoint
    pub fn new() -> Result<Self, TokenError> {
        Self::for_base_url(DEFAULT_BASE_URL)
    }

    /// Manager for `<base_url>/oauth2/token`
    pub fn for_base_url(base_url: &str) -> Result<Self, TokenError> {
        let http = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(http, format!("{}{TOKEN_PATH}", base_url.trim_end_matches('/'))))
    }

    /// Manager using an existing reqwest client
    pub fn with_client(http: ReqwestClient, token_url: impl Into<String>) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            cache: TokenCache::new(),
            expiry_buffer: chrono::Duration::seconds(TOKEN_EXPIRY_BUFFER_SECS),
        }
    }

    /// Share an existing cache
    pub fn with_cache(mut self, cache: TokenCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Return a cached token for `client_id`, or exchange the credentials
    /// for a new one.
    ///
    /// Concurrent callers that miss the cache may each fetch; the last write
    /// wins.
    ///
    /// # Errors
    /// - `TokenExchangeFailed` with the upstream status and body
    /// - `Cancelled` when `cancel` fires first
    #[instrument(skip(self, client_secret, cancel))]
    pub async fn get_access_token(
        &self,
        client_id: &str,
        client_secret: &str,
        cancel: &CancellationToken,
    ) -> Result<Token, TokenError> {
        if let Some(token) = self.cache.get(client_id).await {
            if !token.is_expired(self.expiry_buffer) {
                debug!("Using cached access token");
                return Ok(token);
            }
            debug!(expires_at = %token.expires_at, "Cached access token is expiring");
        }

        let token = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TokenError::Cancelled),
            result = self.exchange(client_id, client_secret) => result?,
        };

        self.cache.insert(client_id, token.clone()).await;
        info!(expires_at = %token.expires_at, "Obtained new access token");
        Ok(token)
    }

    /// Drop every cached token
    pub async fn clear_token_cache(&self) {
        self.cache.clear().await;
        debug!("Token cache cleared");
    }

    async fn exchange(&self, client_id: &str, client_secret: &str) -> Result<Token, TokenError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&GRANT_TYPE)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TokenError::TokenExchangeFailed { status, body });
        }

        let token: Token = serde_json::from_str(&body)?;
        Ok(token.stamp(Utc::now()))
    }
}
