//! Secret storage backends
//!
//! Every backend implements [`SecretStore`], a flat string-keyed map of
//! secrets. The credential layer in `ponto-infra` decides which backend to
//! open and owns the key naming scheme.

pub mod error;
pub mod file_store;
#[cfg(feature = "platform")]
pub mod keychain;
pub mod traits;

pub use error::KeychainError;
pub use file_store::EncryptedFileStore;
#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
pub use traits::SecretStore;
