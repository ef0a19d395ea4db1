//! End-to-end client flows: stored credentials, token exchange, retries and
//! synchronization polling against a mock Ponto API.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ponto_common::testing::MockKeychainProvider;
use ponto_domain::constants::SYNC_SUBTYPE_ACCOUNT_DETAILS;
use ponto_infra::api::PontoClientBuilder;
use ponto_infra::http::AttemptFailure;
use ponto_infra::{
    ClientContext, ClientError, CredentialError, CredentialStore, Credentials, Token,
    TokenManager, TransportError,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_with(profile: &str, credentials: &Credentials) -> CredentialStore {
    let store = CredentialStore::with_backend(Arc::new(MockKeychainProvider::new("ponto")));
    store.set_credentials(profile, credentials).expect("credentials should be stored");
    store
}

fn account_body() -> serde_json::Value {
    json!({"data": {"id": "acc-1", "type": "account", "attributes": {"description": "Main"}}})
}

async fn mount_token(server: &MockServer, access_token: &str, expires_in: i64, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(support::token_body(access_token, expires_in)),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn profile_credentials_are_exchanged_once_and_reused() {
    let server = MockServer::start().await;
    mount_token(&server, "fresh-token", 1800, 1).await;
    Mock::given(method("GET"))
        .and(path("/accounts/acc-1"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(2)
        .mount(&server)
        .await;

    let store = store_with("work", &Credentials::new("client-id", "client-secret"));
    let tokens = Arc::new(TokenManager::for_base_url(&server.uri()).expect("token manager"));
    let builder = PontoClientBuilder::for_profile(ClientContext::new("work"), &store, tokens)
        .expect("profile has credentials");
    let client = support::configure(builder, &server).build().expect("client should build");

    client.get_account("acc-1").await.expect("first call");
    let account = client.get_account("acc-1").await.expect("second call");
    assert_eq!(account.description, "Main");
}

#[tokio::test]
async fn token_inside_the_expiry_buffer_is_refreshed() {
    let server = MockServer::start().await;
    mount_token(&server, "renewed", 1800, 1).await;
    Mock::given(method("GET"))
        .and(path("/accounts/acc-1"))
        .and(header("authorization", "Bearer renewed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = Arc::new(TokenManager::for_base_url(&server.uri()).expect("token manager"));
    tokens.cache().insert("client-id", Token::issued_at("stale", 30, Utc::now())).await;

    let store = store_with("default", &Credentials::new("client-id", "client-secret"));
    let builder = PontoClientBuilder::for_profile(ClientContext::default(), &store, tokens.clone())
        .expect("profile has credentials");
    support::configure(builder, &server)
        .build()
        .expect("client should build")
        .get_account("acc-1")
        .await
        .expect("request with renewed token");

    let cached = tokens.cache().get("client-id").await.expect("token cached");
    assert_eq!(cached.access_token, "renewed");
}

#[tokio::test]
async fn missing_profile_credentials_fail_before_any_request() {
    let store = CredentialStore::with_backend(Arc::new(MockKeychainProvider::new("ponto")));
    let tokens = Arc::new(TokenManager::new().expect("token manager"));

    let err = PontoClientBuilder::for_profile(ClientContext::new("ghost"), &store, tokens)
        .expect_err("no credentials stored");
    assert!(matches!(
        err,
        ClientError::Credentials(CredentialError::CredentialsNotFound { ref profile })
            if profile == "ghost"
    ));
}

#[tokio::test]
async fn async_profile_lookup_builds_a_working_client() {
    let server = MockServer::start().await;
    mount_token(&server, "async-token", 1800, 1).await;
    Mock::given(method("GET"))
        .and(path("/accounts/acc-1"))
        .and(header("authorization", "Bearer async-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(account_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("work", &Credentials::new("client-id", "client-secret"));
    let tokens = Arc::new(TokenManager::for_base_url(&server.uri()).expect("token manager"));
    let builder = PontoClientBuilder::for_profile_async(ClientContext::new("work"), &store, tokens)
        .await
        .expect("profile has credentials");
    let account = support::configure(builder, &server)
        .build()
        .expect("client should build")
        .get_account("acc-1")
        .await
        .expect("request with stored credentials");
    assert_eq!(account.description, "Main");
}

#[tokio::test(flavor = "current_thread")]
async fn async_profile_lookup_reports_missing_credentials() {
    let store = CredentialStore::with_backend(Arc::new(MockKeychainProvider::new("ponto")));
    let tokens = Arc::new(TokenManager::new().expect("token manager"));

    let err = PontoClientBuilder::for_profile_async(ClientContext::new("ghost"), &store, tokens)
        .await
        .expect_err("no credentials stored");
    assert!(matches!(
        err,
        ClientError::Credentials(CredentialError::CredentialsNotFound { ref profile })
            if profile == "ghost"
    ));
}

#[tokio::test]
async fn rejected_token_exchange_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_with("default", &Credentials::new("client-id", "wrong"));
    let tokens = Arc::new(TokenManager::for_base_url(&server.uri()).expect("token manager"));
    let builder = PontoClientBuilder::for_profile(ClientContext::default(), &store, tokens)
        .expect("profile has credentials");
    let err = support::configure(builder, &server)
        .build()
        .expect("client should build")
        .list_accounts()
        .await
        .expect_err("token exchange fails");

    let message = err.to_string();
    assert!(message.starts_with("get access token:"), "{message}");
    assert!(message.contains("401"), "{message}");
    assert!(message.contains("invalid_client"), "{message}");
}

#[tokio::test]
async fn transient_server_errors_are_retried() {
    let server = MockServer::start().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(move |_: &wiremock::Request| -> ResponseTemplate {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(503)
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "data": [{"id": "acc-1", "type": "account", "attributes": {}}]
                }))
            }
        })
        .mount(&server)
        .await;

    let client = support::client_for(&server, ClientContext::default());
    let accounts = client.list_accounts().await.expect("third attempt succeeds");

    assert_eq!(accounts.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn exhausted_retries_report_the_attempt_count() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(3)
        .mount(&server)
        .await;

    let client = support::client_for(&server, ClientContext::default());
    let err = client.list_accounts().await.expect_err("every attempt fails");

    match err {
        ClientError::Transport(TransportError::Exhausted { attempts, last }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(
                last,
                AttemptFailure::Status { status, .. } if status.as_u16() == 502
            ));
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
}

#[tokio::test]
async fn raw_error_body_becomes_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/financial-institutions/fi-9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such institution"))
        .mount(&server)
        .await;

    let client = support::client_for(&server, ClientContext::default());
    let err = client.get_financial_institution("fi-9").await.expect_err("not found");

    let api = err.api_error().expect("api error");
    assert_eq!(api.status_code, 404);
    assert_eq!(api.code, "");
    assert_eq!(api.message, "no such institution");
}

#[tokio::test]
async fn create_then_wait_for_sync() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/synchronizations"))
        .and(body_json(json!({
            "data": {
                "type": "synchronization",
                "attributes": {
                    "resourceType": "account",
                    "resourceId": "acc-1",
                    "subtype": "accountDetails",
                    "customerIpAddress": support::TEST_IP
                }
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "sync-1", "type": "synchronization",
                     "attributes": {"status": "pending", "subtype": "accountDetails"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/synchronizations/sync-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "sync-1", "type": "synchronization",
                     "attributes": {"status": "success", "subtype": "accountDetails"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = support::client_for(&server, ClientContext::default());
    let created = client
        .create_sync(support::ACCOUNT_ID, SYNC_SUBTYPE_ACCOUNT_DETAILS)
        .await
        .expect("sync created");
    let finished = client.wait_for_sync(&created.id).await.expect("sync finished");

    assert_eq!(finished.status, "success");
}

#[tokio::test]
async fn cancelled_context_stops_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(account_body())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let client = support::client_for(
        &server,
        ClientContext::default().with_cancellation(cancel.clone()),
    );

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = client.get_account("acc-1").await.expect_err("request cancelled");
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_secs(5));
}
