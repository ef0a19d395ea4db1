//! Credential store with legacy layout migration
//!
//! Credentials for a profile live in one JSON record under
//! `ponto:<profile>:credentials`. Older releases wrote two entries,
//! `ponto:<profile>:client_id` and `ponto:<profile>:client_secret`; the first
//! successful read of such a profile rewrites it into the unified record.

use std::sync::Arc;

use ponto_common::security::{KeychainError, SecretStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::backend::{open_backend, StoreConfig};
use super::error::CredentialError;

/// OAuth client credentials for one profile
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

pub(crate) fn credentials_key(profile: &str) -> String {
    format!("ponto:{profile}:credentials")
}

pub(crate) fn legacy_client_id_key(profile: &str) -> String {
    format!("ponto:{profile}:client_id")
}

pub(crate) fn legacy_client_secret_key(profile: &str) -> String {
    format!("ponto:{profile}:client_secret")
}

/// Per-profile credential storage over a [`SecretStore`]
///
/// Operations are blocking; async callers should run them on a blocking
/// thread.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn SecretStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").field("backend", &self.backend.backend_name()).finish()
    }
}

impl CredentialStore {
    /// Open the backend selected by `config`.
    ///
    /// # Errors
    /// - `InvalidBackend` for an unknown backend override
    /// - `NoTty` when the file store needs a passphrase and none is available
    /// - `KeyringTimeout` when an auto-selected keychain does not answer in
    ///   time
    pub async fn open(config: &StoreConfig) -> Result<Self, CredentialError> {
        Ok(Self { backend: open_backend(config).await? })
    }

    /// Wrap an already opened backend
    pub fn with_backend(backend: Arc<dyn SecretStore>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Read the credentials for `profile`, migrating the legacy layout.
    ///
    /// # Errors
    /// - `MissingProfile` when `profile` is blank
    /// - `CredentialsNotFound` when neither layout is present
    /// - `Storage` for any other backend failure
    #[instrument(skip(self), fields(backend = self.backend.backend_name()))]
    pub fn get_credentials(&self, profile: &str) -> Result<Credentials, CredentialError> {
        let profile = normalize_profile(profile)?;

        match self.backend.get_secret(&credentials_key(profile)) {
            Ok(raw) => match serde_json::from_str::<Credentials>(&raw) {
                Ok(credentials) => return Ok(credentials),
                Err(e) => {
                    warn!(error = %e, "Unreadable unified credential record, trying legacy keys");
                }
            },
            Err(KeychainError::NotFound) => {}
            Err(source) => return Err(storage("read", profile, source)),
        }

        let client_id = self.read_legacy(&legacy_client_id_key(profile), profile)?;
        let client_secret = self.read_legacy(&legacy_client_secret_key(profile), profile)?;
        let credentials = Credentials { client_id, client_secret };

        self.migrate_legacy(profile, &credentials);
        Ok(credentials)
    }

    /// Overwrite the credentials for `profile`
    #[instrument(
        skip(self, credentials),
        fields(backend = self.backend.backend_name(), client_id = %credentials.client_id)
    )]
    pub fn set_credentials(
        &self,
        profile: &str,
        credentials: &Credentials,
    ) -> Result<(), CredentialError> {
        let profile = normalize_profile(profile)?;
        self.write_unified(profile, credentials)?;
        debug!("Credentials stored");
        Ok(())
    }

    /// Remove the credentials for `profile`.
    ///
    /// A missing record is not an error. Legacy entries are removed best
    /// effort.
    #[instrument(skip(self), fields(backend = self.backend.backend_name()))]
    pub fn delete_credentials(&self, profile: &str) -> Result<(), CredentialError> {
        let profile = normalize_profile(profile)?;

        match self.backend.delete_secret(&credentials_key(profile)) {
            Ok(()) | Err(KeychainError::NotFound) => {}
            Err(source) => return Err(storage("delete", profile, source)),
        }

        self.remove_legacy(profile);
        info!("Credentials deleted");
        Ok(())
    }

    fn read_legacy(&self, key: &str, profile: &str) -> Result<String, CredentialError> {
        self.backend.get_secret(key).map_err(|e| match e {
            KeychainError::NotFound => {
                CredentialError::CredentialsNotFound { profile: profile.to_string() }
            }
            source => storage("read", profile, source),
        })
    }

    fn write_unified(
        &self,
        profile: &str,
        credentials: &Credentials,
    ) -> Result<(), CredentialError> {
        let record = zeroize::Zeroizing::new(serde_json::to_string(credentials)?);
        self.backend
            .set_secret(&credentials_key(profile), &record)
            .map_err(|source| storage("write", profile, source))
    }

    /// Legacy entries are only dropped once the unified record is written.
    fn migrate_legacy(&self, profile: &str, credentials: &Credentials) {
        match self.write_unified(profile, credentials) {
            Ok(()) => {
                self.remove_legacy(profile);
                info!("Migrated legacy credentials to unified record");
            }
            Err(e) => {
                warn!(error = %e, "Could not migrate legacy credentials; keeping legacy keys");
            }
        }
    }

    fn remove_legacy(&self, profile: &str) {
        for key in [legacy_client_id_key(profile), legacy_client_secret_key(profile)] {
            if let Err(e) = self.backend.delete_secret(&key) {
                if !e.is_not_found() {
                    debug!(key = %key, error = %e, "Ignoring legacy credential cleanup failure");
                }
            }
        }
    }
}

fn normalize_profile(profile: &str) -> Result<&str, CredentialError> {
    let profile = profile.trim();
    if profile.is_empty() {
        return Err(CredentialError::MissingProfile);
    }
    Ok(profile)
}

fn storage(operation: &'static str, profile: &str, source: KeychainError) -> CredentialError {
    CredentialError::Storage { operation, profile: profile.to_string(), source }
}
