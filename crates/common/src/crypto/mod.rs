//! Symmetric encryption for secrets at rest

pub mod encryption;

pub use encryption::{CryptoError, EncryptedData, EncryptionService};
