//! Native OS keychain backend
//!
//! Thin wrapper over the platform keychain: macOS Keychain Access, Windows
//! Credential Manager, and the Linux Secret Service.
//!
//! ## Usage
//!
//! ```no_run
//! use ponto_common::security::{KeychainProvider, SecretStore};
//!
//! let keychain = KeychainProvider::new("ponto");
//! keychain.set_secret("ponto:default:credentials", "{}")?;
//! let secret = keychain.get_secret("ponto:default:credentials")?;
//! # Ok::<(), ponto_common::security::KeychainError>(())
//! ```

use keyring::Entry;
use tracing::debug;

use super::error::KeychainError;
use super::traits::SecretStore;

/// Entry read by [`KeychainProvider::check_access`]; it is never written
const ACCESS_CHECK_KEY: &str = "__ponto_access_check__";

/// Keychain provider scoped to one service name
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Round-trip to the keychain daemon without touching real entries.
    ///
    /// On Linux this is the call that blocks when the Secret Service is
    /// registered on the session bus but never answers.
    pub fn check_access(&self) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, "Checking keychain access");

        match self.create_entry(ACCESS_CHECK_KEY)?.get_password().map_err(keyring_error) {
            Ok(_) | Err(KeychainError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn create_entry(&self, key: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, key).map_err(|e| {
            debug!(service = %self.service_name, key = %key, error = %e, "Invalid keychain entry");
            KeychainError::Keyring(e)
        })
    }
}

/// `NoEntry` is the only keyring error callers branch on.
fn keyring_error(err: keyring::Error) -> KeychainError {
    match err {
        keyring::Error::NoEntry => KeychainError::NotFound,
        other => KeychainError::Keyring(other),
    }
}

impl SecretStore for KeychainProvider {
    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        self.create_entry(key)?.get_password().map_err(keyring_error)
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        self.create_entry(key)?.set_password(value).map_err(keyring_error)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        self.create_entry(key)?.delete_credential().map_err(keyring_error)
    }

    fn backend_name(&self) -> &'static str {
        "keychain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_map_to_not_found() {
        let err = keyring_error(keyring::Error::NoEntry);
        assert!(err.is_not_found());
    }

    #[test]
    fn other_failures_keep_the_keyring_error() {
        let err = keyring_error(keyring::Error::Invalid("service".into(), "empty".into()));
        assert!(matches!(err, KeychainError::Keyring(keyring::Error::Invalid(..))));
        assert!(err.to_string().starts_with("keyring error:"));
    }
}
