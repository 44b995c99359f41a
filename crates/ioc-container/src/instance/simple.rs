//! Per-container instances

use super::{LifetimeCell, cell_backed_instance};
use crate::descriptor::ComponentDescriptor;
use std::sync::Arc;

/// Container-scoped wrapper: one object per resolving container
pub struct SimpleInstance {
    descriptor: Arc<ComponentDescriptor>,
    cell: LifetimeCell,
}

impl SimpleInstance {
    pub(crate) fn new(descriptor: Arc<ComponentDescriptor>) -> Self {
        Self {
            descriptor,
            cell: LifetimeCell::new(),
        }
    }
}

cell_backed_instance!(SimpleInstance);
