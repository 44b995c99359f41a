//! Per-repository instances

use super::{LifetimeCell, cell_backed_instance};
use crate::descriptor::ComponentDescriptor;
use std::sync::Arc;

/// Repository-scoped wrapper: one object per registered descriptor,
/// reference-counted across every container built on the owning repository.
///
/// Once torn down the wrapper stays in the repository as Disposed; resolving
/// the descriptor again fails until it is registered anew.
pub struct SharedInstance {
    descriptor: Arc<ComponentDescriptor>,
    cell: LifetimeCell,
}

impl SharedInstance {
    pub(crate) fn new(descriptor: Arc<ComponentDescriptor>) -> Self {
        Self {
            descriptor,
            cell: LifetimeCell::new(),
        }
    }
}

cell_backed_instance!(SharedInstance);
