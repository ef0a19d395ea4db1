//! Test doubles for code built on [`SecretStore`](crate::security::SecretStore)
//!
//! Enabled for this crate's own tests and, for downstream crates, through the
//! `test-utils` feature.

pub mod mocks;

pub use mocks::MockKeychainProvider;
