//! Constants Tests

use ioc_infrastructure::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_FILENAME, DEFAULT_LOG_LEVEL,
    LOG_FILTER_ENV,
};
use ioc_infrastructure::logging::parse_log_level;

#[test]
fn test_config_file_is_toml() {
    assert!(DEFAULT_CONFIG_FILENAME.ends_with(".toml"));
}

#[test]
fn test_log_filter_env_shares_config_prefix() {
    assert!(LOG_FILTER_ENV.starts_with(CONFIG_ENV_PREFIX));
    assert_ne!(CONFIG_ENV_SEPARATOR, "_");
}

#[test]
fn test_default_log_level_is_valid() {
    assert!(parse_log_level(DEFAULT_LOG_LEVEL).is_ok());
}
