//! Lifetime state machine shared by every instance variant
//!
//! Uninstantiated -> Constructing -> Instantiated -> Disposed. The object is
//! stored only after its constructor returned successfully; a failed
//! constructor moves the cell back to Uninstantiated. A cell never leaves
//! Disposed.
//!
//! Constructors run without the cell lock. A thread finding a cell under
//! construction by another thread waits for it, unless that thread is itself
//! (transitively) waiting on the caller, which is a cross-thread
//! construction cycle.

use super::{Acquired, ComponentInstance, Constructed, InstanceStatus};
use crate::component::ComponentObject;
use crate::container::{ContainerId, stack};
use crate::descriptor::{ComponentDescriptor, DescriptorId};
use ioc_domain::{Error, Result};
use once_cell::sync::Lazy;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::{debug, trace};

struct Live {
    object: ComponentObject,
    holders: Vec<ContainerId>,
    dependencies: Vec<Arc<dyn ComponentInstance>>,
}

enum CellState {
    Uninstantiated,
    Constructing(ThreadId),
    Instantiated(Live),
    // Descriptors with an id at or past the watermark were registered after teardown
    Disposed { watermark: DescriptorId },
}

/// Mutex-guarded lifetime of one wrapped object
pub(crate) struct LifetimeCell {
    state: Mutex<CellState>,
    settled: Condvar,
}

impl LifetimeCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(CellState::Uninstantiated),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn status(&self) -> InstanceStatus {
        match &*self.state.lock() {
            CellState::Uninstantiated | CellState::Constructing(_) => {
                InstanceStatus::Uninstantiated
            }
            CellState::Instantiated(_) => InstanceStatus::Instantiated,
            CellState::Disposed { .. } => InstanceStatus::Disposed,
        }
    }

    pub(crate) fn reference_count(&self) -> usize {
        match &*self.state.lock() {
            CellState::Instantiated(live) => live.holders.len(),
            _ => 0,
        }
    }

    pub(crate) fn is_referenced_by(&self, holder: ContainerId) -> bool {
        match &*self.state.lock() {
            CellState::Instantiated(live) => live.holders.contains(&holder),
            _ => false,
        }
    }

    /// Whether the object was torn down before `descriptor` was registered
    pub(crate) fn is_disposed_before(&self, descriptor: DescriptorId) -> bool {
        match &*self.state.lock() {
            CellState::Disposed { watermark } => descriptor >= *watermark,
            _ => false,
        }
    }

    /// Return the object for `holder`, running `build` if nobody has yet.
    ///
    /// Re-entry for the same cell on one thread is rejected earlier by the
    /// resolve stack. Returns `None` for a disposed cell.
    pub(crate) fn acquire(
        &self,
        holder: ContainerId,
        build: &mut dyn FnMut() -> Result<Constructed>,
    ) -> Result<Option<Acquired>> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        loop {
            let owner = match &mut *state {
                CellState::Disposed { .. } => return Ok(None),
                CellState::Instantiated(live) => return Ok(Some(live.reference(holder))),
                CellState::Uninstantiated => break,
                CellState::Constructing(owner) => *owner,
            };
            let Some(_edge) = WaitEdge::register(me, owner, self) else {
                return Err(Error::recursion(stack::chain()));
            };
            trace!(?owner, "Waiting for construction on another thread");
            self.settled.wait(&mut state);
        }
        *state = CellState::Constructing(me);
        drop(state);

        let claim = Claim { cell: self };
        let Constructed {
            object,
            dependencies,
        } = build()?;
        claim.settle(CellState::Instantiated(Live {
            object: object.clone(),
            holders: vec![holder],
            dependencies,
        }));
        Ok(Some(Acquired {
            object,
            newly_referenced: true,
            dependencies: Vec::new(),
        }))
    }

    /// Add a reference to an already instantiated object
    pub(crate) fn retain(&self, holder: ContainerId) -> Option<Acquired> {
        match &mut *self.state.lock() {
            CellState::Instantiated(live) => Some(live.reference(holder)),
            _ => None,
        }
    }

    /// Drop `holder`'s reference; the last reference moves the cell to Disposed
    /// and hands the object back for teardown.
    fn release(&self, holder: ContainerId) -> Option<ComponentObject> {
        let mut state = self.state.lock();
        let CellState::Instantiated(live) = &mut *state else {
            return None;
        };
        live.holders.retain(|current| *current != holder);
        if !live.holders.is_empty() {
            return None;
        }
        let disposed = CellState::Disposed {
            watermark: DescriptorId::watermark(),
        };
        match std::mem::replace(&mut *state, disposed) {
            CellState::Instantiated(live) => Some(live.object),
            _ => None,
        }
    }

    /// Release `holder`'s reference and tear the object down if it was the last.
    ///
    /// The wrapper stays Disposed afterwards. Returns whether the object was
    /// torn down.
    pub(crate) fn release_and_dispose(
        &self,
        holder: ContainerId,
        descriptor: &ComponentDescriptor,
    ) -> Result<bool> {
        let Some(object) = self.release(holder) else {
            return Ok(false);
        };
        debug!(
            component = descriptor.name(),
            scope = %descriptor.scope(),
            "Disposing component instance"
        );
        descriptor
            .dispose_object(&object)
            .map_err(|source| Error::disposal(descriptor.name(), source))?;
        Ok(true)
    }
}

/// Construction claimed by the current thread; resets the cell unless settled
struct Claim<'a> {
    cell: &'a LifetimeCell,
}

impl Claim<'_> {
    fn settle(self, next: CellState) {
        self.finish(next);
        std::mem::forget(self);
    }

    fn finish(&self, next: CellState) {
        let mut state = self.cell.state.lock();
        *state = next;
        WaitEdge::clear_for(self.cell);
        drop(state);
        self.cell.settled.notify_all();
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.finish(CellState::Uninstantiated);
    }
}

/// For each blocked thread, the thread it waits on and the cell it waits for
static WAITS_FOR: Lazy<Mutex<HashMap<ThreadId, (ThreadId, usize)>>> =
    Lazy::new(Default::default);

fn cell_address(cell: &LifetimeCell) -> usize {
    std::ptr::from_ref(cell).addr()
}

/// Edge `waiter -> owner` in the wait-for graph, removed on drop.
///
/// Edges are registered and cleared while holding the awaited cell's lock,
/// so an edge always names the thread currently constructing that cell.
struct WaitEdge {
    waiter: ThreadId,
}

impl WaitEdge {
    /// Add the edge, or `None` if `owner` already waits on `waiter`
    /// directly or through other threads
    fn register(waiter: ThreadId, owner: ThreadId, cell: &LifetimeCell) -> Option<Self> {
        let mut waits = WAITS_FOR.lock();
        let mut current = owner;
        loop {
            if current == waiter {
                return None;
            }
            match waits.get(&current) {
                Some((next, _)) => current = *next,
                None => break,
            }
        }
        waits.insert(waiter, (owner, cell_address(cell)));
        Some(Self { waiter })
    }

    /// Drop every edge waiting on `cell`, whose construction just ended
    fn clear_for(cell: &LifetimeCell) {
        let address = cell_address(cell);
        WAITS_FOR
            .lock()
            .retain(|_, (_, awaited)| *awaited != address);
    }
}

impl Drop for WaitEdge {
    fn drop(&mut self) {
        WAITS_FOR.lock().remove(&self.waiter);
    }
}

impl Live {
    fn reference(&mut self, holder: ContainerId) -> Acquired {
        let newly_referenced = !self.holders.contains(&holder);
        let dependencies = if newly_referenced {
            self.holders.push(holder);
            self.dependencies.clone()
        } else {
            Vec::new()
        };
        Acquired {
            object: self.object.clone(),
            newly_referenced,
            dependencies,
        }
    }
}

/// Implements the cell-backed parts of [`ComponentInstance`] for a variant
/// with `descriptor` and `cell` fields.
macro_rules! cell_backed_instance {
    ($variant:ty) => {
        impl $crate::instance::ComponentInstance for $variant {
            fn descriptor(&self) -> &std::sync::Arc<$crate::descriptor::ComponentDescriptor> {
                &self.descriptor
            }

            fn status(&self) -> $crate::instance::InstanceStatus {
                self.cell.status()
            }

            fn reference_count(&self) -> usize {
                self.cell.reference_count()
            }

            fn is_referenced_by(&self, container: $crate::container::ContainerId) -> bool {
                self.cell.is_referenced_by(container)
            }

            fn create_instance(
                &self,
                holder: $crate::container::ContainerId,
                build: &mut dyn FnMut() -> ioc_domain::Result<$crate::instance::Constructed>,
            ) -> ioc_domain::Result<Option<$crate::instance::Acquired>> {
                self.cell.acquire(holder, build)
            }

            fn retain(
                &self,
                holder: $crate::container::ContainerId,
            ) -> Option<$crate::instance::Acquired> {
                self.cell.retain(holder)
            }

            fn release(&self, holder: $crate::container::ContainerId) -> ioc_domain::Result<bool> {
                self.cell.release_and_dispose(holder, &self.descriptor)
            }
        }

        impl std::fmt::Debug for $variant {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($variant))
                    .field("component", &self.descriptor.name())
                    .field("status", &self.cell.status())
                    .field("references", &self.cell.reference_count())
                    .finish()
            }
        }
    };
}

pub(crate) use cell_backed_instance;
