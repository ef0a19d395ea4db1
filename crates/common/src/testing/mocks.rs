//! Mock implementations of common traits

// Mutex poisoning is acceptable in test mocks: a panicking test fails anyway.
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::security::{KeychainError, SecretStore};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// In-memory secret store
///
/// Clones share storage, so a test can keep a handle for raw inspection
/// while the code under test owns another.
#[derive(Debug, Clone)]
pub struct MockKeychainProvider {
    storage: StorageData,
    service_name: String,
    fail_writes: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl MockKeychainProvider {
    /// Create a new mock keychain provider with a service name for namespacing.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            service_name: service_name.into(),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_deletes: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Make every subsequent `set_secret` fail with `AccessFailed`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete_secret` fail with `AccessFailed`.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Determine whether a secret exists.
    #[must_use]
    pub fn secret_exists(&self, key: &str) -> bool {
        self.storage.lock().unwrap().contains_key(key)
    }

    /// Snapshot of the stored keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.storage.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for MockKeychainProvider {
    fn default() -> Self {
        Self::new("ponto-test")
    }
}

impl SecretStore for MockKeychainProvider {
    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.storage.lock().unwrap().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("write refused for {key}")));
        }
        self.storage.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("delete refused for {key}")));
        }
        self.storage.lock().unwrap().remove(key).map(|_| ()).ok_or(KeychainError::NotFound)
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let keychain = MockKeychainProvider::default();
        let handle = keychain.clone();

        keychain.set_secret("a", "1").unwrap();
        assert!(handle.secret_exists("a"));
        assert_eq!(handle.keys(), vec!["a".to_string()]);
    }

    #[test]
    fn failure_toggles() {
        let keychain = MockKeychainProvider::default();
        keychain.set_secret("a", "1").unwrap();

        keychain.fail_writes(true);
        assert!(matches!(keychain.set_secret("b", "2"), Err(KeychainError::AccessFailed(_))));

        keychain.fail_deletes(true);
        assert!(matches!(keychain.delete_secret("a"), Err(KeychainError::AccessFailed(_))));
        assert_eq!(keychain.get_secret("a").unwrap(), "1");
    }

    #[test]
    fn delete_of_missing_key_is_not_found() {
        let keychain = MockKeychainProvider::default();
        assert!(keychain.delete_secret("missing").unwrap_err().is_not_found());
    }
}
