//! # Infrastructure Layer
//!
//! Cross-cutting concerns around the component container runtime.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based configuration loading and validation |
//! | [`logging`] | `tracing-subscriber` initialization |
//! | [`error_ext`] | Context extension for foreign errors |
//! | [`bootstrap`] | Container factory applying configured settings |
//! | [`constants`] | File names, env prefixes and defaults |
//!
//! ## Example
//!
//! ```rust,no_run
//! use ioc_container::ComponentRepository;
//! use ioc_infrastructure::{ConfigLoader, ContainerFactory};
//!
//! # fn main() -> ioc_domain::Result<()> {
//! let config = ConfigLoader::new().load()?;
//! ioc_infrastructure::logging::init_logging(&config.logging)?;
//!
//! let factory = ContainerFactory::from_config(ComponentRepository::new(), &config);
//! let container = factory.create();
//! container.dispose()?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;

pub use bootstrap::ContainerFactory;
pub use config::{AppConfig, ConfigBuilder, ConfigLoader, LoggingConfig};
pub use error_ext::ErrorContext;
