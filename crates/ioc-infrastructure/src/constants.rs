//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Resolution defaults are defined in `ioc_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "ioc.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "ioc";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "IOC";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable holding a full `EnvFilter` directive
pub const LOG_FILTER_ENV: &str = "IOC_LOG";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "ioc";
