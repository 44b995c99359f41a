//! Registered component metadata

use crate::component::ComponentObject;
use crate::definition::Constructor;
use crate::repository::{ComponentRepository, WeakComponentRepository};
use ioc_domain::{BoxError, InstanceScope, TypeKey};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DESCRIPTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a registered descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(u64);

impl DescriptorId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Lowest id a descriptor registered from now on can receive
    pub(crate) fn watermark() -> Self {
        Self(NEXT_DESCRIPTOR_ID.load(Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Produces a boxed `Arc<I>` from a component object of the matching type
pub(crate) type Caster =
    Arc<dyn Fn(&ComponentObject) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// Runs the component's dispose hook
pub(crate) type Disposer = fn(&ComponentObject) -> Result<(), BoxError>;

/// One interface a component is registered to provide
#[derive(Clone)]
pub(crate) struct InterfaceBinding {
    pub(crate) key: TypeKey,
    pub(crate) caster: Caster,
}

/// Configuration object supplied at registration
#[derive(Clone)]
pub(crate) struct ComponentConfig {
    pub(crate) key: TypeKey,
    pub(crate) value: Arc<dyn Any + Send + Sync>,
}

/// Static metadata for one registered component.
///
/// Created by [`ComponentRepository::add_component`] and immutable
/// afterwards. Lives as long as its owning repository.
pub struct ComponentDescriptor {
    pub(crate) id: DescriptorId,
    pub(crate) name: String,
    pub(crate) implementation: TypeKey,
    pub(crate) interfaces: Vec<InterfaceBinding>,
    pub(crate) scope: InstanceScope,
    pub(crate) config: Option<ComponentConfig>,
    pub(crate) private_repository: Option<ComponentRepository>,
    pub(crate) owner: WeakComponentRepository,
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) disposer: Disposer,
}

impl ComponentDescriptor {
    /// Process-unique descriptor id
    pub fn id(&self) -> DescriptorId {
        self.id
    }

    /// Declared component name, reported to progress callbacks
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete implementation type
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// Interfaces this component is registered to provide, in declaration order
    pub fn interfaces(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.interfaces.iter().map(|binding| binding.key)
    }

    /// Whether this component provides the given interface
    pub fn provides(&self, interface: &TypeKey) -> bool {
        self.interfaces.iter().any(|binding| binding.key == *interface)
    }

    /// Declared lifetime scope
    pub fn scope(&self) -> InstanceScope {
        self.scope
    }

    /// Type of the registered configuration object, if any
    pub fn config_type(&self) -> Option<TypeKey> {
        self.config.as_ref().map(|config| config.key)
    }

    /// The registered configuration object, if it has type `C`
    pub fn config<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.config
            .as_ref()
            .and_then(|config| Arc::clone(&config.value).downcast::<C>().ok())
    }

    /// Private child repository supplied at registration
    pub fn private_repository(&self) -> Option<&ComponentRepository> {
        self.private_repository.as_ref()
    }

    /// Repository this descriptor was registered in, while it is alive
    pub fn owner(&self) -> Option<ComponentRepository> {
        self.owner.upgrade()
    }

    /// Registered constructors, in registration order
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Repository injected into `ComponentRepository` constructor parameters
    pub(crate) fn injection_repository(&self) -> Option<ComponentRepository> {
        self.private_repository.clone().or_else(|| self.owner())
    }

    /// Interface view of `object` as a boxed `Arc<I>`
    pub(crate) fn cast(
        &self,
        interface: &TypeKey,
        object: &ComponentObject,
    ) -> Option<Box<dyn Any + Send + Sync>> {
        self.interfaces
            .iter()
            .find(|binding| binding.key == *interface)
            .and_then(|binding| (binding.caster)(object))
    }

    pub(crate) fn dispose_object(&self, object: &ComponentObject) -> Result<(), BoxError> {
        (self.disposer)(object)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("implementation", &self.implementation)
            .field("interfaces", &self.interfaces().collect::<Vec<_>>())
            .field("scope", &self.scope)
            .field("config", &self.config_type())
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
