//! Passphrase-encrypted file backend
//!
//! One file per key inside a private directory. File names are the URL-safe
//! base64 encoding of the key, contents are an [`EncryptedData`] JSON
//! document. Each write derives a fresh Argon2 salt, which is stored next to
//! the ciphertext.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;
use zeroize::Zeroizing;

use super::error::KeychainError;
use super::traits::SecretStore;
use crate::crypto::{CryptoError, EncryptedData, EncryptionService};

const TMP_SUFFIX: &str = ".tmp";

/// Encrypted secret store rooted at a directory
pub struct EncryptedFileStore {
    dir: PathBuf,
    passphrase: Zeroizing<String>,
}

impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("dir", &self.dir)
            .field("passphrase", &"[REDACTED]")
            .finish()
    }
}

impl EncryptedFileStore {
    /// Open (creating if needed) the store directory.
    ///
    /// The passphrase is not verified here; a wrong passphrase surfaces as
    /// [`CryptoError::Decrypt`] on the first read.
    pub fn open(
        dir: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Result<Self, KeychainError> {
        let dir = dir.into();
        create_private_dir(&dir)?;
        debug!(dir = %dir.display(), "Opened encrypted file store");
        Ok(Self { dir, passphrase: Zeroizing::new(passphrase.into()) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(URL_SAFE_NO_PAD.encode(key.as_bytes()))
    }
}

impl SecretStore for EncryptedFileStore {
    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        let path = self.path_for(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(KeychainError::NotFound),
            Err(e) => return Err(e.into()),
        };

        let encrypted: EncryptedData = serde_json::from_slice(&raw)?;
        let salt = encrypted
            .salt
            .as_deref()
            .ok_or_else(|| CryptoError::Unsupported("missing salt".to_string()))?;
        let service = EncryptionService::from_password_with_salt(&self.passphrase, Some(salt))?;
        let plaintext = Zeroizing::new(service.decrypt(&encrypted)?);

        String::from_utf8(plaintext.to_vec())
            .map_err(|_| CryptoError::Unsupported("secret is not UTF-8".to_string()).into())
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        let service = EncryptionService::from_password(&self.passphrase)?;
        let encrypted = service.encrypt(value.as_bytes())?;
        let body = serde_json::to_vec(&encrypted)?;

        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);
        let tmp = PathBuf::from(tmp);

        write_private_file(&tmp, &body)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(key = %key, "Stored secret in encrypted file store");
        Ok(())
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(KeychainError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
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
