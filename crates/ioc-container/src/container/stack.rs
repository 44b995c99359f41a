//! Per-thread resolve stack used for cycle detection
//!
//! Every construction pushes a frame keyed by the scope key of the wrapper
//! being built and pops it on return, success or failure. A key already on
//! the stack is a construction cycle. Cycles spanning threads are caught by
//! the instance cells, which report this stack as the chain.

use super::ContainerId;
use crate::descriptor::{ComponentDescriptor, DescriptorId};
use ioc_domain::{Error, InstanceScope, Result, TypeKey};
use std::cell::RefCell;
use std::marker::PhantomData;
use tracing::trace;

/// Identity of one wrapper across containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKey {
    Container(ContainerId, DescriptorId),
    Repository(DescriptorId),
    Global(TypeKey),
}

impl ScopeKey {
    pub(crate) fn of(container: ContainerId, descriptor: &ComponentDescriptor) -> Self {
        match descriptor.scope() {
            InstanceScope::Container => Self::Container(container, descriptor.id()),
            InstanceScope::Repository => Self::Repository(descriptor.id()),
            InstanceScope::Global => Self::Global(descriptor.implementation()),
        }
    }
}

struct Frame {
    key: ScopeKey,
    name: String,
}

thread_local! {
    static RESOLVE_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Frame on the current thread's resolve stack, popped on drop
pub(crate) struct ResolveGuard {
    // Must be dropped on the thread that pushed the frame
    _not_send: PhantomData<*const ()>,
}

impl ResolveGuard {
    /// Push a frame, failing with `Error::Recursion` if `key` is already on
    /// the stack or the stack is `max_depth` deep.
    pub(crate) fn enter(key: ScopeKey, name: &str, max_depth: usize) -> Result<Self> {
        RESOLVE_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|frame| frame.key == key) || stack.len() >= max_depth {
                let mut chain: Vec<String> = stack.iter().map(|frame| frame.name.clone()).collect();
                chain.push(name.to_string());
                return Err(Error::recursion(chain));
            }
            trace!(component = name, depth = stack.len(), "Resolve stack push");
            stack.push(Frame {
                key,
                name: name.to_string(),
            });
            Ok(Self {
                _not_send: PhantomData,
            })
        })
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        RESOLVE_STACK.with(|stack| {
            if let Some(frame) = stack.borrow_mut().pop() {
                trace!(component = %frame.name, "Resolve stack pop");
            }
        });
    }
}

/// Depth of the current thread's resolve stack
pub(crate) fn depth() -> usize {
    RESOLVE_STACK.with(|stack| stack.borrow().len())
}

/// Component names on the current thread's resolve stack, outermost first
pub(crate) fn chain() -> Vec<String> {
    RESOLVE_STACK.with(|stack| stack.borrow().iter().map(|frame| frame.name.clone()).collect())
}
