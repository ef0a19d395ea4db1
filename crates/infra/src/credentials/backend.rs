//! Secret storage backend selection
//!
//! Selection is evaluated once per open:
//! 1. An override (environment, else config file) picks `auto`, `keychain`
//!    or `file`.
//! 2. `auto` on a Secret Service platform without a session bus falls back
//!    to the encrypted file store.
//! 3. `auto` with a session bus opens the keychain under a fixed deadline,
//!    since a registered but unresponsive Secret Service blocks forever.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ponto_common::security::{EncryptedFileStore, KeychainError, KeychainProvider, SecretStore};
use ponto_domain::constants::{
    APP_NAME, ENV_DBUS_SESSION_BUS, ENV_KEYRING_BACKEND, ENV_KEYRING_PASSWORD,
    KEYRING_OPEN_TIMEOUT_SECS,
};
use ponto_domain::{KeyringBackend, PontoConfig};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::error::CredentialError;
use crate::config::{ConfigLoader, EnvSource};

/// Inputs to backend selection
#[derive(Clone)]
pub struct StoreConfig {
    /// Raw backend name from the environment or config file
    pub backend_override: Option<String>,
    /// Passphrase for the encrypted file store
    pub password: Option<Zeroizing<String>>,
    pub keyring_dir: PathBuf,
    /// Keychain service name
    pub service_name: String,
    pub session_bus_present: bool,
    /// Whether the native keychain is reached over the session bus
    pub platform_uses_secret_service: bool,
    /// Whether a passphrase prompt can be shown
    pub is_tty: bool,
    pub open_timeout: Duration,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend_override", &self.backend_override)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("keyring_dir", &self.keyring_dir)
            .field("service_name", &self.service_name)
            .field("session_bus_present", &self.session_bus_present)
            .field("platform_uses_secret_service", &self.platform_uses_secret_service)
            .field("is_tty", &self.is_tty)
            .field("open_timeout", &self.open_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Defaults for the current platform with no overrides
    pub fn new(keyring_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend_override: None,
            password: None,
            keyring_dir: keyring_dir.into(),
            service_name: APP_NAME.to_string(),
            session_bus_present: false,
            platform_uses_secret_service: cfg!(target_os = "linux"),
            is_tty: false,
            open_timeout: Duration::from_secs(KEYRING_OPEN_TIMEOUT_SECS),
        }
    }

    /// Build from the environment and the persisted configuration.
    ///
    /// The environment override wins over `keyring_backend` in the config
    /// file. TTY detection looks at stdin.
    pub fn from_env(
        env: &dyn EnvSource,
        config: &PontoConfig,
        keyring_dir: impl Into<PathBuf>,
    ) -> Self {
        let backend_override = env.non_empty(ENV_KEYRING_BACKEND).or_else(|| {
            config.keyring_backend.clone().filter(|backend| !backend.trim().is_empty())
        });

        Self {
            backend_override,
            password: env.non_empty(ENV_KEYRING_PASSWORD).map(Zeroizing::new),
            session_bus_present: env.non_empty(ENV_DBUS_SESSION_BUS).is_some(),
            is_tty: std::io::stdin().is_terminal(),
            ..Self::new(keyring_dir)
        }
    }

    /// Read the configuration file under `loader` and build from it,
    /// keeping the encrypted keyring beside the file.
    ///
    /// # Errors
    /// Returns `CredentialError::Config` if the file cannot be read or parsed.
    pub fn load(env: &dyn EnvSource, loader: &ConfigLoader) -> Result<Self, CredentialError> {
        let config = loader.load()?;
        Ok(Self::from_env(env, &config, loader.keyring_dir()))
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend_override = Some(backend.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    /// Parsed backend selector
    ///
    /// # Errors
    /// Returns `CredentialError::InvalidBackend` for unknown names.
    pub fn backend(&self) -> Result<KeyringBackend, CredentialError> {
        match self.backend_override.as_deref() {
            Some(name) => Ok(name.parse()?),
            None => Ok(KeyringBackend::Auto),
        }
    }

    /// Decide how to open the store
    pub fn plan(&self) -> Result<BackendPlan, CredentialError> {
        let plan = match self.backend()? {
            KeyringBackend::File => BackendPlan::File,
            KeyringBackend::Keychain => BackendPlan::Keychain { bounded: false },
            KeyringBackend::Auto if self.platform_uses_secret_service => {
                if self.session_bus_present {
                    BackendPlan::Keychain { bounded: true }
                } else {
                    BackendPlan::File
                }
            }
            KeyringBackend::Auto => BackendPlan::Keychain { bounded: false },
        };
        Ok(plan)
    }
}

/// Outcome of backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendPlan {
    /// Encrypted file store in the keyring directory
    File,
    /// Native keychain, checked under the open deadline when `bounded`
    Keychain { bounded: bool },
}

/// Open the secret store selected by `config`
pub(crate) async fn open_backend(
    config: &StoreConfig,
) -> Result<Arc<dyn SecretStore>, CredentialError> {
    let plan = config.plan()?;
    debug!(?plan, backend = ?config.backend_override, "Selected keyring backend");

    match plan {
        BackendPlan::File => {
            let passphrase = file_passphrase(config).await?;
            let dir = config.keyring_dir.clone();
            let store = EncryptedFileStore::open(dir, passphrase.as_str())
                .map_err(|source| CredentialError::Open { backend: "file", source })?;
            info!(dir = %config.keyring_dir.display(), "Using encrypted file keyring");
            Ok(Arc::new(store))
        }
        BackendPlan::Keychain { bounded: false } => {
            Ok(Arc::new(KeychainProvider::new(config.service_name.clone())))
        }
        BackendPlan::Keychain { bounded: true } => {
            let keychain = KeychainProvider::new(config.service_name.clone());
            let checked = keychain.clone();
            open_with_timeout(move || checked.check_access(), config.open_timeout).await?;
            info!(service = %config.service_name, "Using system keychain");
            Ok(Arc::new(keychain))
        }
    }
}

/// Run a blocking open on its own thread and give up after `timeout`.
///
/// The thread is never joined. On timeout the receiver is dropped, so a late
/// result is discarded and runtime shutdown does not wait for the open.
pub(crate) async fn open_with_timeout<T, F>(
    open: F,
    timeout: Duration,
) -> Result<T, CredentialError>
where
    F: FnOnce() -> Result<T, KeychainError> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    std::thread::Builder::new()
        .name("ponto-keyring-open".to_string())
        .spawn(move || {
            let _ = tx.send(open());
        })
        .map_err(|e| CredentialError::OpenTask(e.to_string()))?;

    match tokio::time::timeout(timeout, rx).await {
        Ok(Ok(result)) => {
            result.map_err(|source| CredentialError::Open { backend: "keychain", source })
        }
        Ok(Err(_)) => Err(CredentialError::OpenTask("keyring open thread exited".to_string())),
        Err(_) => {
            warn!(timeout = ?timeout, "Keyring open timed out");
            Err(CredentialError::KeyringTimeout(timeout))
        }
    }
}

async fn file_passphrase(config: &StoreConfig) -> Result<Zeroizing<String>, CredentialError> {
    if let Some(password) = &config.password {
        return Ok(password.clone());
    }
    if !config.is_tty {
        return Err(CredentialError::NoTty);
    }

    tokio::task::spawn_blocking(|| rpassword::prompt_password("Enter keyring password: "))
        .await
        .map_err(|e| CredentialError::OpenTask(e.to_string()))?
        .map(Zeroizing::new)
        .map_err(CredentialError::Prompt)
}
