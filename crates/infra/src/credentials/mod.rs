//! Per-profile API credential storage
//!
//! [`CredentialStore`] owns the key naming scheme and the legacy migration;
//! [`StoreConfig`] carries everything backend selection needs so opening a
//! store never reads globals.

pub mod backend;
pub mod error;
pub mod store;

pub use backend::{BackendPlan, StoreConfig};
pub use error::CredentialError;
pub use store::{CredentialStore, Credentials};
