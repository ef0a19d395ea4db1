//! Secret storage errors

use thiserror::Error;

use crate::crypto::CryptoError;

/// Errors raised by [`SecretStore`](super::SecretStore) implementations
#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("keychain access failed: {0}")]
    AccessFailed(String),

    #[error("secret not found")]
    NotFound,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "platform")]
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("encrypted store error: {0}")]
    Encryption(#[from] CryptoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeychainError {
    /// Whether this error only reports a missing secret
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
