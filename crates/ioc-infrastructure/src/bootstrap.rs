//! Container bootstrap
//!
//! A [`ContainerFactory`] pairs a component repository with the configured
//! [`ContainerSettings`] and hands out one container per unit of work.
//!
//! ```text
//! AppConfig ─┐
//!            ├─> ContainerFactory ──create()──> ComponentContainer (per unit of work)
//! Repository ┘
//! ```

use crate::config::AppConfig;
use ioc_container::{ComponentContainer, ComponentContainerBuilder, ComponentRepository};
use ioc_domain::ContainerSettings;
use tracing::debug;

/// Builds containers over one repository with shared settings
#[derive(Debug, Clone)]
pub struct ContainerFactory {
    repository: ComponentRepository,
    settings: ContainerSettings,
}

impl ContainerFactory {
    /// Factory with explicit settings
    pub fn new(repository: ComponentRepository, settings: ContainerSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Factory using the container section of a loaded configuration
    pub fn from_config(repository: ComponentRepository, config: &AppConfig) -> Self {
        Self::new(repository, config.container.clone())
    }

    /// Repository every container resolves from
    pub fn repository(&self) -> &ComponentRepository {
        &self.repository
    }

    /// Settings applied to every container
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// Create a fresh container
    pub fn create(&self) -> ComponentContainer {
        self.builder().build()
    }

    /// Builder preloaded with the repository and settings, for adding external instances
    pub fn builder(&self) -> ComponentContainerBuilder {
        debug!(
            components = self.repository.len(),
            max_resolve_depth = self.settings.max_resolve_depth,
            "Preparing container"
        );
        ComponentContainer::builder(self.repository.clone()).settings(self.settings.clone())
    }
}
