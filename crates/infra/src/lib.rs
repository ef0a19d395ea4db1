//! # Ponto Infrastructure
//!
//! All I/O for the Ponto client core.
//!
//! This crate contains:
//! - Configuration file loading and environment lookup
//! - The credential store (backend selection, bounded open, legacy migration)
//! - OAuth client-credentials token management
//! - The retrying HTTP transport
//! - The JSON:API resource client and outbound IP detection
//! - Tracing setup
//!
//! ## Architecture
//! - Types come from `ponto-domain`
//! - Secret storage backends come from `ponto-common`

pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{ClientContext, ClientError, PontoClient, PontoClientBuilder};
pub use auth::{Token, TokenCache, TokenError, TokenManager};
pub use config::{ConfigError, ConfigLoader, EnvSource, ProcessEnv};
pub use credentials::{CredentialError, CredentialStore, Credentials, StoreConfig};
pub use http::{HttpClient, TransportError};
