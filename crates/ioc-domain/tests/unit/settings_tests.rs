//! Unit tests for ContainerSettings

use ioc_domain::ContainerSettings;
use ioc_domain::constants::DEFAULT_MAX_RESOLVE_DEPTH;

#[test]
fn test_settings_default() {
    let settings = ContainerSettings::default();
    assert_eq!(settings.max_resolve_depth, DEFAULT_MAX_RESOLVE_DEPTH);
    assert!(!settings.log_progress);
}

#[test]
fn test_settings_missing_fields_use_defaults() {
    let settings: ContainerSettings = toml::from_str("log_progress = true").unwrap();
    assert!(settings.log_progress);
    assert_eq!(settings.max_resolve_depth, DEFAULT_MAX_RESOLVE_DEPTH);
}
