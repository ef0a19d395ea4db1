//! Secret storage primitives shared across Ponto crates.
//!
//! - [`security`]: the [`SecretStore`] seam with keychain and encrypted-file
//!   implementations
//! - [`crypto`]: passphrase-derived AES-256-GCM encryption
//! - [`testing`]: in-memory doubles (feature `test-utils`)
//!
//! # Feature Tiers
//! - `platform` (default): native OS keychain through `keyring`
//! - `test-utils`: exports [`testing::MockKeychainProvider`]

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod crypto;
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use crypto::{CryptoError, EncryptedData, EncryptionService};
pub use security::{EncryptedFileStore, KeychainError, SecretStore};
#[cfg(feature = "platform")]
pub use security::KeychainProvider;
