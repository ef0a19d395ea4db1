//! Ponto resource client
//!
//! Every request fetches a bearer token, goes through the retrying
//! [`HttpClient`] and races the context's cancellation token. Error statuses
//! become [`ApiError`](ponto_domain::ApiError); success bodies are decoded
//! from JSON:API envelopes.

use std::sync::Arc;
use std::time::Duration;

use ponto_domain::constants::{
    DEFAULT_BASE_URL, SYNC_POLL_INTERVAL_SECS, USER_AGENT_PRODUCT,
};
use ponto_domain::{
    parse_date, Account, FinancialInstitution, Identified, Organization, PendingTransaction,
    Synchronization, Transaction, TransactionListOptions,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument};
use url::Url;

use super::auth::{AccessTokenProvider, ClientCredentialsProvider};
use super::context::ClientContext;
use super::decode::{decode_list, decode_resource, parse_api_error, Page};
use super::errors::ClientError;
use super::ip::{OutboundIpResolver, PublicIpResolver};
use crate::auth::TokenManager;
use crate::credentials::{CredentialError, CredentialStore, Credentials};
use crate::http::{HttpClient, TransportError};

const APPLICATION_JSON: &str = "application/json";

/// `ponto-cli/<version> (<os>/<arch>)`
pub fn user_agent() -> String {
    format!(
        "{USER_AGENT_PRODUCT}/{} ({}/{})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Authenticated client for the Ponto API
pub struct PontoClient {
    http: HttpClient,
    base_url: String,
    auth: Arc<dyn AccessTokenProvider>,
    ip_resolver: Arc<dyn OutboundIpResolver>,
    ctx: ClientContext,
    poll_interval: Duration,
}

impl std::fmt::Debug for PontoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PontoClient")
            .field("base_url", &self.base_url)
            .field("profile", &self.ctx.profile)
            .field("max_attempts", &self.http.max_attempts())
            .finish_non_exhaustive()
    }
}

impl PontoClient {
    /// Create a builder for fluent configuration
    pub fn builder(auth: Arc<dyn AccessTokenProvider>) -> PontoClientBuilder {
        PontoClientBuilder::new(auth)
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all accounts
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ClientError> {
        Ok(self.get_list("/accounts").await?.items)
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, account_id: &str) -> Result<Account, ClientError> {
        self.get_resource(&format!("/accounts/{account_id}")).await
    }

    /// List an account's transactions, following `next` links.
    ///
    /// Stops as soon as the options' limit is reached and truncates the
    /// result to exactly that many transactions.
    ///
    /// # Errors
    /// - `InvalidDate` when `since` or `until` cannot be normalized
    /// - any request or decode error from a page
    #[instrument(
        skip(self, options),
        fields(since = ?options.since, until = ?options.until, limit = ?options.limit)
    )]
    pub async fn list_transactions(
        &self,
        account_id: &str,
        options: &TransactionListOptions,
    ) -> Result<Vec<Transaction>, ClientError> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &options.page_size().to_string());
        if let Some(since) = options.since.as_deref() {
            query.append_pair("filter[valueDate][gte]", &parse_date(since)?);
        }
        if let Some(until) = options.until.as_deref() {
            query.append_pair("filter[valueDate][lte]", &parse_date(until)?);
        }

        let limit = options.effective_limit();
        let mut path = format!("/accounts/{account_id}/transactions?{}", query.finish());
        let mut transactions = Vec::new();
        let mut pages = 0usize;

        loop {
            let page: Page<Transaction> = self.get_list(&path).await?;
            pages += 1;
            transactions.extend(page.items);

            if let Some(limit) = limit {
                if transactions.len() >= limit {
                    transactions.truncate(limit);
                    break;
                }
            }

            match page.next {
                Some(next) => path = path_and_query(&next)?,
                None => break,
            }
        }

        debug!(pages, count = transactions.len(), "Listed transactions");
        Ok(transactions)
    }

    #[instrument(skip(self))]
    pub async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, ClientError> {
        self.get_resource(&format!("/accounts/{account_id}/transactions/{transaction_id}")).await
    }

    #[instrument(skip(self))]
    pub async fn list_pending_transactions(
        &self,
        account_id: &str,
    ) -> Result<Vec<PendingTransaction>, ClientError> {
        Ok(self.get_list(&format!("/accounts/{account_id}/pending-transactions")).await?.items)
    }

    /// Start a synchronization of `subtype` for an account.
    ///
    /// The request carries the detected outbound IP as `customerIpAddress`.
    #[instrument(skip(self))]
    pub async fn create_sync(
        &self,
        account_id: &str,
        subtype: &str,
    ) -> Result<Synchronization, ClientError> {
        let ip = self.ip_resolver.resolve(&self.ctx.cancel).await;
        let payload = json!({
            "data": {
                "type": "synchronization",
                "attributes": {
                    "resourceType": "account",
                    "resourceId": account_id,
                    "subtype": subtype,
                    "customerIpAddress": ip,
                }
            }
        });

        let path = "/synchronizations";
        let body = self.execute(Method::POST, path, Some(payload.to_string().into_bytes())).await?;
        let sync: Synchronization =
            decode_resource(&body).map_err(|e| ClientError::decode(path, e))?;

        info!(sync_id = %sync.id, status = %sync.status, "Synchronization created");
        Ok(sync)
    }

    #[instrument(skip(self))]
    pub async fn get_sync(&self, sync_id: &str) -> Result<Synchronization, ClientError> {
        self.get_resource(&format!("/synchronizations/{sync_id}")).await
    }

    /// Poll a synchronization until it reaches `success` or `error`.
    ///
    /// # Errors
    /// `Cancelled` when the context's token fires between polls; no final
    /// status fetch is made.
    #[instrument(skip(self))]
    pub async fn wait_for_sync(&self, sync_id: &str) -> Result<Synchronization, ClientError> {
        loop {
            let sync = self.get_sync(sync_id).await?;
            if sync.is_terminal() {
                info!(status = %sync.status, "Synchronization finished");
                return Ok(sync);
            }

            debug!(status = %sync.status, "Synchronization still running");
            tokio::select! {
                biased;
                _ = self.ctx.cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// Recent synchronizations for an account; `limit` of zero means the API
    /// default.
    #[instrument(skip(self))]
    pub async fn list_syncs(
        &self,
        account_id: &str,
        limit: usize,
    ) -> Result<Vec<Synchronization>, ClientError> {
        let mut path = format!("/accounts/{account_id}/synchronizations");
        if limit > 0 {
            path.push_str(&format!("?limit={limit}"));
        }
        Ok(self.get_list(&path).await?.items)
    }

    #[instrument(skip(self))]
    pub async fn list_financial_institutions(
        &self,
    ) -> Result<Vec<FinancialInstitution>, ClientError> {
        Ok(self.get_list("/financial-institutions").await?.items)
    }

    #[instrument(skip(self))]
    pub async fn get_financial_institution(
        &self,
        institution_id: &str,
    ) -> Result<FinancialInstitution, ClientError> {
        self.get_resource(&format!("/financial-institutions/{institution_id}")).await
    }

    /// The organization owning the credentials
    #[instrument(skip(self))]
    pub async fn get_organization(&self) -> Result<Organization, ClientError> {
        self.get_resource("/userinfo").await
    }

    async fn get_resource<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Identified,
    {
        let body = self.execute(Method::GET, path, None).await?;
        decode_resource(&body).map_err(|e| ClientError::decode(path, e))
    }

    async fn get_list<T>(&self, path: &str) -> Result<Page<T>, ClientError>
    where
        T: DeserializeOwned + Identified,
    {
        let body = self.execute(Method::GET, path, None).await?;
        decode_list(&body).map_err(|e| ClientError::decode(path, e))
    }

    /// Send one authenticated request and return the success body
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ClientError> {
        let token = self.auth.access_token(&self.ctx.cancel).await?;
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.http.request(method.clone(), &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, APPLICATION_JSON).body(body);
        }

        let response = self.http.send(request, &self.ctx.cancel).await?;
        let status = response.status();
        let bytes = tokio::select! {
            biased;
            _ = self.ctx.cancel.cancelled() => return Err(ClientError::Cancelled),
            bytes = response.bytes() => bytes.map_err(TransportError::from)?,
        };

        if status.is_client_error() || status.is_server_error() {
            let err = parse_api_error(status.as_u16(), &String::from_utf8_lossy(&bytes));
            debug!(%method, path, status = status.as_u16(), code = %err.code, "API error");
            return Err(err.into());
        }

        Ok(bytes.to_vec())
    }
}

/// Path and query of an absolute `next` link; the host is never followed.
fn path_and_query(link: &str) -> Result<String, ClientError> {
    let url = Url::parse(link)
        .map_err(|source| ClientError::InvalidUrl { url: link.to_string(), source })?;
    Ok(match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    })
}

/// Builder for [`PontoClient`]
pub struct PontoClientBuilder {
    auth: Arc<dyn AccessTokenProvider>,
    base_url: String,
    ctx: ClientContext,
    ip_resolver: Option<Arc<dyn OutboundIpResolver>>,
    poll_interval: Duration,
    max_attempts: Option<usize>,
    base_backoff: Option<Duration>,
}

impl std::fmt::Debug for PontoClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PontoClientBuilder")
            .field("base_url", &self.base_url)
            .field("ctx", &self.ctx)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl PontoClientBuilder {
    pub fn new(auth: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            auth,
            base_url: DEFAULT_BASE_URL.to_string(),
            ctx: ClientContext::default(),
            ip_resolver: None,
            poll_interval: Duration::from_secs(SYNC_POLL_INTERVAL_SECS),
            max_attempts: None,
            base_backoff: None,
        }
    }

    /// Builder for the context's profile using the credentials held in
    /// `store`
    ///
    /// This reads the secret store on the calling thread, which can block on
    /// a keychain daemon. From async code prefer [`Self::for_profile_async`].
    ///
    /// # Errors
    /// `Credentials` when the profile has no stored credentials.
    #[instrument(skip(ctx, store, tokens), fields(profile = %ctx.profile))]
    pub fn for_profile(
        ctx: ClientContext,
        store: &CredentialStore,
        tokens: Arc<TokenManager>,
    ) -> Result<Self, ClientError> {
        let credentials = store.get_credentials(&ctx.profile)?;
        Ok(Self::with_credentials(ctx, tokens, credentials))
    }

    /// [`Self::for_profile`] with the secret store read on the blocking pool
    ///
    /// # Errors
    /// `Credentials` when the profile has no stored credentials or the read
    /// task fails.
    #[instrument(skip(ctx, store, tokens), fields(profile = %ctx.profile))]
    pub async fn for_profile_async(
        ctx: ClientContext,
        store: &CredentialStore,
        tokens: Arc<TokenManager>,
    ) -> Result<Self, ClientError> {
        let store = store.clone();
        let profile = ctx.profile.clone();
        let credentials = tokio::task::spawn_blocking(move || store.get_credentials(&profile))
            .await
            .map_err(|e| CredentialError::OpenTask(e.to_string()))??;
        Ok(Self::with_credentials(ctx, tokens, credentials))
    }

    fn with_credentials(
        ctx: ClientContext,
        tokens: Arc<TokenManager>,
        credentials: Credentials,
    ) -> Self {
        let auth = Arc::new(ClientCredentialsProvider::new(tokens, credentials));
        Self::new(auth).context(ctx)
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Profile, timeout, retry mode and cancellation for this client
    pub fn context(mut self, ctx: ClientContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn ip_resolver(mut self, resolver: Arc<dyn OutboundIpResolver>) -> Self {
        self.ip_resolver = Some(resolver);
        self
    }

    /// Delay between synchronization status polls
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Attempt budget when the context allows retries
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = Some(backoff);
        self
    }

    /// Build the client
    ///
    /// # Errors
    /// `Transport` when the underlying HTTP client cannot be created.
    pub fn build(self) -> Result<PontoClient, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

        let mut http = HttpClient::builder()
            .timeout(self.ctx.timeout)
            .user_agent(user_agent())
            .default_headers(headers);
        if let Some(attempts) = self.max_attempts {
            http = http.max_attempts(attempts);
        }
        if let Some(backoff) = self.base_backoff {
            http = http.base_backoff(backoff);
        }
        let http = http.no_retry(self.ctx.no_retry).build()?;

        let ip_resolver = match self.ip_resolver {
            Some(resolver) => resolver,
            None => Arc::new(PublicIpResolver::new().map_err(TransportError::from)?),
        };

        Ok(PontoClient {
            http,
            base_url: self.base_url,
            auth: self.auth,
            ip_resolver,
            ctx: self.ctx,
            poll_interval: self.poll_interval,
        })
    }
}
