//! Main application configuration

use super::logging::LoggingConfig;
use ioc_domain::ContainerSettings;
use serde::{Deserialize, Serialize};

/// Top-level configuration
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [container]
/// max_resolve_depth = 32
/// log_progress = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Settings applied to every container the factory builds
    pub container: ContainerSettings,
}
