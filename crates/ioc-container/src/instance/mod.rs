//! Component instance lifetimes
//!
//! | Variant | Scope key | Shared by |
//! |---------|-----------|-----------|
//! | [`SimpleInstance`] | container + descriptor | the resolving container |
//! | [`SharedInstance`] | descriptor | every container on the owning repository |
//! | [`SingletonInstance`] | implementation type | every container in the process (per [`SingletonRegistry`]) |
//!
//! Each variant wraps the same lifetime cell. The reference count is the
//! number of distinct containers holding the instance; the object is torn
//! down when the last one releases it. A torn-down wrapper stays in its
//! registry as Disposed and is never rebuilt: resolving it again fails with
//! `Error::Disposed` until the component is registered anew.

mod lifetime;
mod registry;
mod shared;
mod simple;
mod singleton;

pub(crate) use lifetime::{LifetimeCell, cell_backed_instance};
pub(crate) use registry::InstanceRegistry;
pub use registry::SingletonRegistry;
pub use shared::SharedInstance;
pub use simple::SimpleInstance;
pub use singleton::SingletonInstance;

use crate::component::ComponentObject;
use crate::container::ContainerId;
use crate::descriptor::ComponentDescriptor;
use ioc_domain::Result;
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    /// No object has been constructed yet
    Uninstantiated,
    /// The object is alive and referenced by at least one container
    Instantiated,
    /// The object has been torn down; terminal
    Disposed,
}

/// Output of a successful constructor run
pub struct Constructed {
    /// The new component
    pub object: ComponentObject,
    /// Wrappers resolved directly as constructor arguments
    pub dependencies: Vec<Arc<dyn ComponentInstance>>,
}

/// A reference handed to a container by a wrapper
pub struct Acquired {
    /// The wrapped component
    pub object: ComponentObject,
    /// Whether the container did not hold a reference before
    pub newly_referenced: bool,
    /// Dependencies the newly referencing container must also retain
    pub dependencies: Vec<Arc<dyn ComponentInstance>>,
}

/// Lifetime strategy wrapping one lazily constructed component
pub trait ComponentInstance: Send + Sync {
    /// Descriptor this wrapper was created for
    fn descriptor(&self) -> &Arc<ComponentDescriptor>;

    /// Current lifecycle state
    fn status(&self) -> InstanceStatus;

    /// Number of containers referencing the instance
    fn reference_count(&self) -> usize;

    /// Whether `container` holds a reference
    fn is_referenced_by(&self, container: ContainerId) -> bool;

    /// Return the object, constructing it with `build` if needed, and record
    /// `holder` as referencing it. `None` means the wrapper is disposed.
    fn create_instance(
        &self,
        holder: ContainerId,
        build: &mut dyn FnMut() -> Result<Constructed>,
    ) -> Result<Option<Acquired>>;

    /// Add `holder` as a reference to an instantiated object
    fn retain(&self, holder: ContainerId) -> Option<Acquired>;

    /// Drop `holder`'s reference, tearing the object down if it was the last.
    /// Returns whether the object was torn down.
    fn release(&self, holder: ContainerId) -> Result<bool>;
}

impl fmt::Debug for dyn ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("component", &self.descriptor().name())
            .field("scope", &self.descriptor().scope())
            .field("status", &self.status())
            .field("references", &self.reference_count())
            .finish()
    }
}
