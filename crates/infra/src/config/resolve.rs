//! Profile and account resolution

use ponto_domain::constants::DEFAULT_PROFILE;
use ponto_domain::PontoConfig;

use super::error::ConfigError;

/// Explicit profile, else the configured default, else `"default"`
pub fn resolve_profile(explicit: Option<&str>, config: &PontoConfig) -> String {
    [explicit, config.default_profile.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PROFILE)
        .to_string()
}

/// Explicit account id, else the profile's configured `account_id`
///
/// # Errors
/// Returns `ConfigError::MissingAccountId` naming the profile when neither is
/// set.
pub fn resolve_account_id(
    explicit: Option<&str>,
    profile: &str,
    config: &PontoConfig,
) -> Result<String, ConfigError> {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    config
        .account_id_for(profile)
        .map(|id| id.trim().to_string())
        .ok_or_else(|| ConfigError::MissingAccountId { profile: profile.to_string() })
}
