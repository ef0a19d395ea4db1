//! OAuth client-credentials authentication
//!
//! [`TokenManager`] exchanges client credentials for bearer tokens and keeps
//! them in a [`TokenCache`] keyed by client id until they come within the
//! expiry buffer.

pub mod cache;
pub mod error;
pub mod manager;
pub mod token;

pub use cache::TokenCache;
pub use error::TokenError;
pub use manager::TokenManager;
pub use token::Token;
