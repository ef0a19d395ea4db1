//! HTTP transport with bounded retry

pub mod client;
pub mod error;

pub use client::{HttpClient, HttpClientBuilder};
pub use error::{AttemptFailure, TransportError};
