//! Shared fixtures for the infra integration tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ponto_infra::api::{AccessTokenProvider, OutboundIpResolver};
use ponto_infra::{ClientContext, EnvSource, PontoClient, PontoClientBuilder, TokenError};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

pub const ACCOUNT_ID: &str = "acc-1";
pub const TEST_IP: &str = "203.0.113.7";

/// Always hands out the same bearer token
pub struct StaticTokenProvider(pub &'static str);

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self, _cancel: &CancellationToken) -> Result<String, TokenError> {
        Ok(self.0.to_string())
    }
}

pub struct FixedIpResolver;

#[async_trait]
impl OutboundIpResolver for FixedIpResolver {
    async fn resolve(&self, _cancel: &CancellationToken) -> String {
        TEST_IP.to_string()
    }
}

/// Environment backed by a map
#[derive(Default)]
pub struct TestEnv(HashMap<String, String>);

impl TestEnv {
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for TestEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Builder pointed at `server` with fast polling and backoff
pub fn configure(builder: PontoClientBuilder, server: &MockServer) -> PontoClientBuilder {
    builder
        .base_url(server.uri())
        .ip_resolver(Arc::new(FixedIpResolver))
        .poll_interval(Duration::from_millis(10))
        .base_backoff(Duration::from_millis(1))
}

pub fn client_for(server: &MockServer, ctx: ClientContext) -> PontoClient {
    configure(PontoClient::builder(Arc::new(StaticTokenProvider("test-token"))), server)
        .context(ctx)
        .build()
        .expect("client should build")
}

/// One page of transactions numbered `ids`, optionally linking to `next`
pub fn transaction_page(ids: std::ops::Range<usize>, next: Option<String>) -> Value {
    let data: Vec<Value> = ids
        .map(|n| {
            json!({
                "id": format!("tx-{n:03}"),
                "type": "transaction",
                "attributes": {"amount": n as f64, "currency": "EUR", "valueDate": "2024-01-15"}
            })
        })
        .collect();

    match next {
        Some(next) => json!({"data": data, "links": {"next": next}}),
        None => json!({"data": data, "links": {}}),
    }
}

pub fn token_body(access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "ai pi name",
    })
}
