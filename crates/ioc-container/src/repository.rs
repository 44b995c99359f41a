//! Component repositories
//!
//! A repository is an ordered registry of descriptors, optionally chained to
//! a parent. Interface lookup searches the current level first and falls
//! back to the parent only when the current level has no match; results are
//! never merged across levels.

use crate::component::{Component, ComponentInterface};
use crate::definition::ComponentDefinition;
use crate::descriptor::{ComponentDescriptor, DescriptorId};
use crate::instance::{InstanceRegistry, SharedInstance, SingletonRegistry};
use ioc_domain::{Result, TypeKey};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::debug;

struct RepositoryInner {
    descriptors: RwLock<Vec<Arc<ComponentDescriptor>>>,
    parent: Option<ComponentRepository>,
    shared: InstanceRegistry<DescriptorId, SharedInstance>,
    singletons: SingletonRegistry,
}

/// Registry of component descriptors.
///
/// Cloning yields another handle to the same repository. Repositories are
/// created by the application and may back any number of containers.
#[derive(Clone)]
pub struct ComponentRepository {
    inner: Arc<RepositoryInner>,
}

impl ComponentRepository {
    /// Create a root repository using the process-wide singleton registry
    pub fn new() -> Self {
        Self::build(None, SingletonRegistry::global())
    }

    /// Create a root repository with its own singleton registry
    pub fn with_singletons(singletons: SingletonRegistry) -> Self {
        Self::build(None, singletons)
    }

    /// Create a child repository that falls back to `parent` and shares its
    /// singleton registry
    pub fn with_parent(parent: &ComponentRepository) -> Self {
        Self::build(Some(parent.clone()), parent.singletons().clone())
    }

    fn build(parent: Option<ComponentRepository>, singletons: SingletonRegistry) -> Self {
        Self {
            inner: Arc::new(RepositoryInner {
                descriptors: RwLock::new(Vec::new()),
                parent,
                shared: InstanceRegistry::new(),
                singletons,
            }),
        }
    }

    /// Register a component.
    ///
    /// Fails with `Error::Registration` when the definition provides no
    /// interface, has no constructor, or declares an interface twice.
    /// Constructor satisfiability is checked at resolve time.
    pub fn add_component<T: Component>(
        &self,
        definition: ComponentDefinition<T>,
    ) -> Result<Arc<ComponentDescriptor>> {
        let descriptor = Arc::new(definition.into_descriptor(self.downgrade())?);
        debug!(
            component = descriptor.name(),
            implementation = descriptor.implementation().name(),
            scope = %descriptor.scope(),
            "Registered component"
        );
        self.inner.descriptors.write().push(Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Descriptors providing `interface` from the nearest level that has any
    pub fn descriptors_for(&self, interface: &TypeKey) -> Vec<Arc<ComponentDescriptor>> {
        let mut level = Some(self);
        while let Some(repository) = level {
            let matches: Vec<_> = repository
                .inner
                .descriptors
                .read()
                .iter()
                .filter(|descriptor| descriptor.provides(interface))
                .cloned()
                .collect();
            if !matches.is_empty() {
                return matches;
            }
            level = repository.parent();
        }
        Vec::new()
    }

    /// Typed form of [`descriptors_for`](Self::descriptors_for)
    pub fn component_descriptors<I: ComponentInterface + ?Sized>(
        &self,
    ) -> Vec<Arc<ComponentDescriptor>> {
        self.descriptors_for(&TypeKey::of::<I>())
    }

    /// Descriptors registered at this level, in registration order
    pub fn descriptors(&self) -> Vec<Arc<ComponentDescriptor>> {
        self.inner.descriptors.read().clone()
    }

    /// Number of descriptors registered at this level
    pub fn len(&self) -> usize {
        self.inner.descriptors.read().len()
    }

    /// Whether nothing is registered at this level
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parent repository, if any
    pub fn parent(&self) -> Option<&ComponentRepository> {
        self.inner.parent.as_ref()
    }

    /// Registry holding Global-scope instances
    pub fn singletons(&self) -> &SingletonRegistry {
        &self.inner.singletons
    }

    /// Number of Repository-scope objects currently alive for descriptors
    /// registered here
    pub fn shared_instance_count(&self) -> usize {
        self.inner.shared.live()
    }

    /// Whether both handles refer to the same repository
    pub fn ptr_eq(&self, other: &ComponentRepository) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle
    pub fn downgrade(&self) -> WeakComponentRepository {
        WeakComponentRepository {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub(crate) fn shared_registry(&self) -> &InstanceRegistry<DescriptorId, SharedInstance> {
        &self.inner.shared
    }
}

impl Default for ComponentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComponentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRepository")
            .field("descriptors", &self.len())
            .field("has_parent", &self.inner.parent.is_some())
            .field("shared_instances", &self.shared_instance_count())
            .finish()
    }
}

/// Non-owning repository handle held by descriptors
#[derive(Clone, Default)]
pub struct WeakComponentRepository {
    inner: Weak<RepositoryInner>,
}

impl WeakComponentRepository {
    /// The repository, while any strong handle exists
    pub fn upgrade(&self) -> Option<ComponentRepository> {
        self.inner
            .upgrade()
            .map(|inner| ComponentRepository { inner })
    }
}

impl fmt::Debug for WeakComponentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComponentRepository")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
