//! Trait abstraction over secret storage backends

use super::error::KeychainError;

/// Blocking key/value storage for secrets
///
/// Implementations may block on I/O or on an OS prompt; async callers run
/// them on a blocking thread.
pub trait SecretStore: Send + Sync {
    /// Read the secret stored under `key`
    ///
    /// # Errors
    /// Returns [`KeychainError::NotFound`] when no secret exists for `key`.
    fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Create or overwrite the secret stored under `key`
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Remove the secret stored under `key`
    ///
    /// # Errors
    /// Returns [`KeychainError::NotFound`] when no secret exists for `key`,
    /// so callers can decide whether absence matters.
    fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;

    /// Short backend identifier for logs
    fn backend_name(&self) -> &'static str;
}
