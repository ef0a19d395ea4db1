//! Integration tests for the configuration loader
//!
//! Tests loading configuration from disk and resolving profiles and
//! accounts from it.

use ponto_domain::{PontoConfig, ProfileConfig};
use ponto_infra::config::{resolve_account_id, resolve_profile};
use ponto_infra::{ConfigError, ConfigLoader};
use tempfile::TempDir;

#[test]
fn test_load_config_from_yaml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let yaml = r#"default_profile: work
keyring_backend: file
profiles:
  work:
    account_id: acc-work
  personal:
    account_id: acc-home
"#;
    std::fs::write(dir.path().join("config.yaml"), yaml).expect("Failed to write config");

    let config = ConfigLoader::at(dir.path()).load().expect("Failed to load config");

    assert_eq!(config.default_profile.as_deref(), Some("work"));
    assert_eq!(config.keyring_backend.as_deref(), Some("file"));

    let profile = resolve_profile(None, &config);
    assert_eq!(profile, "work");
    assert_eq!(resolve_account_id(None, &profile, &config).unwrap(), "acc-work");
    assert_eq!(resolve_account_id(None, "personal", &config).unwrap(), "acc-home");
}

#[test]
fn test_saved_config_round_trips_through_disk() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let loader = ConfigLoader::at(dir.path().join("ponto"));
    assert!(!loader.exists().unwrap());

    let mut config = PontoConfig { default_profile: Some("ops".into()), ..Default::default() };
    config.profiles.insert("ops".into(), ProfileConfig { account_id: Some("acc-ops".into()) });
    loader.save(&config).expect("Failed to save config");

    assert!(loader.exists().unwrap());
    assert_eq!(loader.load().expect("Failed to reload config"), config);
}

#[test]
fn test_missing_config_is_empty_and_account_lookup_names_profile() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = ConfigLoader::at(dir.path()).load().expect("Missing file should load");

    assert_eq!(config, PontoConfig::default());
    assert_eq!(resolve_profile(None, &config), "default");

    let err = resolve_account_id(None, "default", &config).unwrap_err();
    assert!(matches!(err, ConfigError::MissingAccountId { ref profile } if profile == "default"));
    assert!(err.to_string().contains("default"));
}

#[test]
fn test_malformed_config_reports_path() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("config.yaml"), "profiles: [not, a, map]").unwrap();

    let err = ConfigLoader::at(dir.path()).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
