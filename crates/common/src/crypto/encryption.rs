//! Passphrase-based encryption for secrets at rest.
//!
//! - [`EncryptionService`]: AES-256-GCM encryption/decryption
//! - [`EncryptedData`]: serializable container written to disk
//! - Key derivation from a passphrase using Argon2
//!
//! ## Usage
//!
//! ```rust
//! use ponto_common::crypto::encryption::EncryptionService;
//!
//! let service = EncryptionService::from_password("correct horse")?;
//! let encrypted = service.encrypt(b"client secret")?;
//!
//! let salt = encrypted.salt.clone().unwrap();
//! let reopened = EncryptionService::from_password_with_salt("correct horse", Some(&salt))?;
//! assert_eq!(reopened.decrypt(&encrypted)?, b"client secret");
//! # Ok::<(), ponto_common::crypto::CryptoError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

const ALGORITHM: &str = "AES-256-GCM";
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encryption failures
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed")]
    Encrypt,

    /// Wrong passphrase or tampered payload
    #[error("decryption failed (wrong passphrase or corrupted data)")]
    Decrypt,

    #[error("unsupported payload: {0}")]
    Unsupported(String),
}

/// Encrypted data container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub salt: Option<String>,
    pub algorithm: String,
}

/// AES-GCM encryption service with optional password-based key derivation.
pub struct EncryptionService {
    cipher: Aes256Gcm,
    password_salt: Option<String>,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key", &"[REDACTED]")
            .field("password_salt", &self.password_salt.is_some())
            .finish()
    }
}

impl EncryptionService {
    /// Create a new encryption service from a raw 32-byte key.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }

        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        Ok(Self { cipher, password_salt: None })
    }

    /// Derive an encryption key from a password with a fresh salt.
    pub fn from_password(password: &str) -> Result<Self, CryptoError> {
        Self::from_password_with_salt(password, None)
    }

    /// Derive an encryption key from a password and optional salt using Argon2.
    pub fn from_password_with_salt(
        password: &str,
        salt: Option<&str>,
    ) -> Result<Self, CryptoError> {
        let salt = match salt {
            Some(existing) => SaltString::from_b64(existing)
                .map_err(|e| CryptoError::KeyDerivation(format!("invalid salt: {e}")))?,
            None => SaltString::generate(OsRng),
        };

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        Argon2::default()
            .hash_password_into(password.as_bytes(), salt.as_str().as_bytes(), key.as_mut())
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

        let mut service = Self::new(key.as_ref())?;
        service.password_salt = Some(salt.as_str().to_string());
        Ok(service)
    }

    /// Encrypt bytes into an `EncryptedData` payload.
    pub fn encrypt(&self, data: &[u8]) -> Result<EncryptedData, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext =
            self.cipher.encrypt(&Nonce::from(nonce), data).map_err(|_| CryptoError::Encrypt)?;

        Ok(EncryptedData {
            nonce: nonce.to_vec(),
            ciphertext,
            salt: self.password_salt.clone(),
            algorithm: ALGORITHM.to_string(),
        })
    }

    /// Decrypt an [`EncryptedData`] payload back into raw bytes.
    pub fn decrypt(&self, encrypted: &EncryptedData) -> Result<Vec<u8>, CryptoError> {
        if encrypted.algorithm != ALGORITHM {
            return Err(CryptoError::Unsupported(encrypted.algorithm.clone()));
        }

        let nonce: [u8; NONCE_LEN] = encrypted
            .nonce
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::Unsupported("nonce must be 12 bytes".to_string()))?;

        self.cipher
            .decrypt(&Nonce::from(nonce), encrypted.ciphertext.as_ref())
            .map_err(|_| CryptoError::Decrypt)
    }
}
