//! Configuration loader
//!
//! Reads and writes the YAML configuration file.
//!
//! ## File Locations
//! - `<user config dir>/ponto/config.yaml`: persisted settings
//! - `<user config dir>/ponto/keyring/`: encrypted file keyring
//!
//! A missing file is an empty configuration. Writes go through a temporary
//! file and a rename so a crash never leaves a truncated config behind.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ponto_domain::constants::APP_NAME;
use ponto_domain::PontoConfig;
use tracing::{debug, info};

use super::error::ConfigError;

const CONFIG_FILE: &str = "config.yaml";
const KEYRING_DIR: &str = "keyring";

/// Locates and persists the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    /// Loader rooted at the platform's user configuration directory.
    ///
    /// # Errors
    /// Returns `ConfigError::NoConfigDir` if the platform reports no
    /// configuration directory (for example when `$HOME` is unset).
    pub fn new() -> Result<Self, ConfigError> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::at(base.join(APP_NAME)))
    }

    /// Loader rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn keyring_dir(&self) -> PathBuf {
        self.dir.join(KEYRING_DIR)
    }

    /// Whether the configuration file exists
    pub fn exists(&self) -> Result<bool, ConfigError> {
        let path = self.config_path();
        match fs::metadata(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Load the configuration, treating a missing file as empty
    ///
    /// # Errors
    /// Returns `ConfigError::Read` on I/O failure and `ConfigError::Parse`
    /// if the file is not valid YAML for [`PontoConfig`].
    pub fn load(&self) -> Result<PontoConfig, ConfigError> {
        let path = self.config_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(PontoConfig::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        if raw.trim().is_empty() {
            return Ok(PontoConfig::default());
        }

        let config = serde_yaml::from_str(&raw)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        debug!(path = %path.display(), "Configuration loaded from file");
        Ok(config)
    }

    /// Persist the configuration atomically with owner-only permissions
    pub fn save(&self, config: &PontoConfig) -> Result<(), ConfigError> {
        create_private_dir(&self.dir)
            .map_err(|source| ConfigError::Write { path: self.dir.clone(), source })?;

        let body = serde_yaml::to_string(config)?;
        let path = self.config_path();
        let tmp = self.dir.join(format!("{CONFIG_FILE}.tmp"));

        write_private_file(&tmp, body.as_bytes())
            .map_err(|source| ConfigError::Write { path: tmp.clone(), source })?;
        fs::rename(&tmp, &path)
            .map_err(|source| ConfigError::Write { path: path.clone(), source })?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)
}

fn write_private_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(body)?;
    file.sync_all()
}
