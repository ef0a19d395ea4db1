//! Environment variable lookup
//!
//! Backend detection reads the environment through [`EnvSource`] so tests
//! can supply values without mutating the process environment.

#[cfg(any(test, feature = "test-utils"))]
use std::collections::HashMap;

/// Read-only view of environment variables
pub trait EnvSource: Send + Sync {
    /// Value of `key`, or `None` when unset or not valid UTF-8
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` when set to a non-empty string
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The current process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables for tests
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
