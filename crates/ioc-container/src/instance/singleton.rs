//! Process-wide instances

use super::{LifetimeCell, cell_backed_instance};
use crate::descriptor::ComponentDescriptor;
use std::sync::Arc;

/// Global-scoped wrapper: one object per implementation type, shared by
/// containers of every repository using the same singleton registry.
///
/// The descriptor is the one that first requested the type; any descriptor
/// registering the same implementation as Global resolves to this wrapper.
pub struct SingletonInstance {
    descriptor: Arc<ComponentDescriptor>,
    cell: LifetimeCell,
}

impl SingletonInstance {
    pub(crate) fn new(descriptor: Arc<ComponentDescriptor>) -> Self {
        Self {
            descriptor,
            cell: LifetimeCell::new(),
        }
    }

    /// Whether this wrapper was torn down before `descriptor` was registered,
    /// so that the new registration gets a fresh object
    pub(crate) fn is_superseded_by(&self, descriptor: &ComponentDescriptor) -> bool {
        self.cell.is_disposed_before(descriptor.id())
    }
}

cell_backed_instance!(SingletonInstance);
