//! Configuration loading and management
//!
//! This module provides the on-disk configuration file, the environment
//! variable seam, and profile/account resolution.

pub mod env;
pub mod error;
pub mod loader;
pub mod resolve;

// Re-export commonly used items
#[cfg(any(test, feature = "test-utils"))]
pub use env::MapEnv;
pub use env::{EnvSource, ProcessEnv};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolve::{resolve_account_id, resolve_profile};
