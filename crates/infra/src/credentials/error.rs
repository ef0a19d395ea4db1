use std::time::Duration;

use ponto_common::security::KeychainError;
use ponto_domain::constants::{ENV_KEYRING_BACKEND, ENV_KEYRING_PASSWORD};
use ponto_domain::InvalidBackend;
use thiserror::Error;

use crate::config::ConfigError;

/// Credential store errors
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("missing profile")]
    MissingProfile,

    #[error("no credentials stored for profile {profile:?}")]
    CredentialsNotFound { profile: String },

    #[error(transparent)]
    InvalidBackend(#[from] InvalidBackend),

    #[error("no TTY available for keyring password prompt; set {var}", var = ENV_KEYRING_PASSWORD)]
    NoTty,

    #[error(
        "keyring connection timed out after {0:?}; set {backend}=file and {password}=<password>",
        backend = ENV_KEYRING_BACKEND,
        password = ENV_KEYRING_PASSWORD
    )]
    KeyringTimeout(Duration),

    #[error("failed to open {backend} keyring: {source}")]
    Open {
        backend: &'static str,
        #[source]
        source: KeychainError,
    },

    #[error("keyring open task failed: {0}")]
    OpenTask(String),

    #[error("failed to read keyring password: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("{operation} credentials for profile {profile:?}: {source}")]
    Storage {
        operation: &'static str,
        profile: String,
        #[source]
        source: KeychainError,
    },

    #[error("encode credentials: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
