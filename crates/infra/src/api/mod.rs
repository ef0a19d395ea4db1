//! Ponto resource client
//!
//! Authenticated JSON:API requests against the Ponto API: bearer tokens from
//! the token manager, retries from the HTTP transport, typed decoding into
//! `ponto-domain` resources.

pub mod auth;
pub mod client;
pub mod context;
pub mod decode;
pub mod errors;
pub mod ip;

pub use auth::{AccessTokenProvider, ClientCredentialsProvider};
pub use client::{PontoClient, PontoClientBuilder};
pub use context::ClientContext;
pub use errors::ClientError;
pub use ip::{OutboundIpResolver, PublicIpResolver};
