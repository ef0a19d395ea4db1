//! Persisted configuration structures
//!
//! Credentials never live here; they are kept in the credential store.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InvalidBackend;

/// Contents of the on-disk configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PontoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub profiles: BTreeMap<String, ProfileConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyring_backend: Option<String>,
}

/// Per-profile defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl PontoConfig {
    /// Default account id configured for `profile`, if any
    pub fn account_id_for(&self, profile: &str) -> Option<&str> {
        self.profiles
            .get(profile)
            .and_then(|p| p.account_id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

/// Secret storage backend selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyringBackend {
    /// Let the platform decide, falling back to the file store when the
    /// secret service is unreachable
    #[default]
    Auto,
    /// Native OS keychain
    Keychain,
    /// Passphrase-encrypted files
    File,
}

impl FromStr for KeyringBackend {
    type Err = InvalidBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "keychain" => Ok(Self::Keychain),
            "file" => Ok(Self::File),
            other => Err(InvalidBackend(other.to_string())),
        }
    }
}

impl fmt::Display for KeyringBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::Keychain => "keychain",
            Self::File => "file",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!(" File ".parse::<KeyringBackend>(), Ok(KeyringBackend::File));
        assert_eq!("KEYCHAIN".parse::<KeyringBackend>(), Ok(KeyringBackend::Keychain));
        assert_eq!("".parse::<KeyringBackend>(), Ok(KeyringBackend::Auto));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let err = "vault".parse::<KeyringBackend>().unwrap_err();
        assert_eq!(err, InvalidBackend("vault".to_string()));
    }

    #[test]
    fn blank_account_id_is_ignored() {
        let mut config = PontoConfig::default();
        config
            .profiles
            .insert("work".into(), ProfileConfig { account_id: Some("  ".into()) });
        assert_eq!(config.account_id_for("work"), None);
        assert_eq!(config.account_id_for("missing"), None);
    }
}
