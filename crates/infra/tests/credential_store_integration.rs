//! Credential store over real backends

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use ponto_common::testing::MockKeychainProvider;
use ponto_common::SecretStore;
use ponto_domain::constants::{ENV_KEYRING_BACKEND, ENV_KEYRING_PASSWORD};
use ponto_domain::PontoConfig;
use ponto_infra::credentials::BackendPlan;
use ponto_infra::{CredentialError, CredentialStore, Credentials, StoreConfig};
use tempfile::TempDir;

fn file_config(dir: &TempDir, password: &str) -> StoreConfig {
    StoreConfig::new(dir.path().join("keyring")).with_backend("file").with_password(password)
}

#[tokio::test]
async fn file_backend_persists_across_opens() {
    let dir = TempDir::new().expect("temp dir");
    let credentials = Credentials::new("client-id", "client-secret");

    let store =
        CredentialStore::open(&file_config(&dir, "hunter2")).await.expect("open file store");
    assert_eq!(store.backend_name(), "file");
    store.set_credentials("work", &credentials).expect("store credentials");

    let reopened =
        CredentialStore::open(&file_config(&dir, "hunter2")).await.expect("reopen file store");
    assert_eq!(reopened.get_credentials("work").expect("read back"), credentials);

    reopened.delete_credentials("work").expect("delete");
    assert!(matches!(
        reopened.get_credentials("work"),
        Err(CredentialError::CredentialsNotFound { .. })
    ));
}

#[tokio::test]
async fn wrong_passphrase_cannot_read_file_backend() {
    let dir = TempDir::new().expect("temp dir");
    let store = CredentialStore::open(&file_config(&dir, "right")).await.expect("open file store");
    store.set_credentials("default", &Credentials::new("id", "secret")).expect("store");

    let wrong = CredentialStore::open(&file_config(&dir, "wrong")).await.expect("open file store");
    let err = wrong.get_credentials("default").expect_err("decryption must fail");
    assert!(matches!(err, CredentialError::Storage { .. }), "{err:?}");
}

#[tokio::test]
async fn environment_selects_file_backend_and_passphrase() {
    let dir = TempDir::new().expect("temp dir");
    let env = support::TestEnv::default()
        .with(ENV_KEYRING_BACKEND, "file")
        .with(ENV_KEYRING_PASSWORD, "from-env");
    let config = StoreConfig::from_env(&env, &PontoConfig::default(), dir.path().join("keyring"));

    assert_eq!(config.plan().expect("valid backend"), BackendPlan::File);
    let store = CredentialStore::open(&config).await.expect("open file store");
    store.set_credentials("default", &Credentials::new("id", "secret")).expect("store");

    let direct = CredentialStore::open(&file_config(&dir, "from-env")).await.expect("reopen");
    assert_eq!(direct.get_credentials("default").expect("read").client_id, "id");
}

#[tokio::test]
async fn unknown_backend_name_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let env = support::TestEnv::default().with(ENV_KEYRING_BACKEND, "vault");
    let config = StoreConfig::from_env(&env, &PontoConfig::default(), dir.path());

    let err = CredentialStore::open(&config).await.expect_err("unknown backend");
    assert!(matches!(err, CredentialError::InvalidBackend(_)));
}

#[test]
fn legacy_profile_is_migrated_on_first_read() {
    let keychain = MockKeychainProvider::new("ponto");
    keychain.set_secret("ponto:work:client_id", "legacy-id").expect("seed id");
    keychain.set_secret("ponto:work:client_secret", "legacy-secret").expect("seed secret");

    let store = CredentialStore::with_backend(Arc::new(keychain.clone()));
    let credentials = store.get_credentials("work").expect("legacy read");

    assert_eq!(credentials, Credentials::new("legacy-id", "legacy-secret"));
    assert_eq!(keychain.keys(), vec!["ponto:work:credentials".to_string()]);

    let again = store.get_credentials("work").expect("unified read");
    assert_eq!(again, credentials);
}

#[test]
fn profiles_do_not_share_credentials() {
    let keychain = MockKeychainProvider::new("ponto");
    let store = CredentialStore::with_backend(Arc::new(keychain));

    store.set_credentials("a", &Credentials::new("id-a", "secret-a")).expect("store a");
    store.set_credentials("b", &Credentials::new("id-b", "secret-b")).expect("store b");
    store.delete_credentials("a").expect("delete a");

    assert!(store.get_credentials("a").is_err());
    assert_eq!(store.get_credentials("b").expect("b survives").client_id, "id-b");
}
