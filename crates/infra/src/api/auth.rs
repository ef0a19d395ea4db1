//! Bearer token source for the resource client

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::auth::{TokenError, TokenManager};
use crate::credentials::Credentials;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with static tokens.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, fetching a new one if needed
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, TokenError>;
}

/// Client-credentials tokens for one profile's credentials
#[derive(Debug, Clone)]
pub struct ClientCredentialsProvider {
    manager: Arc<TokenManager>,
    credentials: Credentials,
}

impl ClientCredentialsProvider {
    pub fn new(manager: Arc<TokenManager>, credentials: Credentials) -> Self {
        Self { manager, credentials }
    }

    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }
}

#[async_trait]
impl AccessTokenProvider for ClientCredentialsProvider {
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, TokenError> {
        let token = self
            .manager
            .get_access_token(&self.credentials.client_id, &self.credentials.client_secret, cancel)
            .await?;
        Ok(token.access_token)
    }
}
