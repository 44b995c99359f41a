//! Deferred resolution values
//!
//! A [`Deferred<I>`] captures "resolve `I` against this container, later".
//! It holds a weak container handle, so storing one inside a component does
//! not keep the container alive. Each call to [`Deferred::get`] performs a
//! fresh synchronous resolve, which lets two components reference each other
//! without a construction cycle.

use crate::component::ComponentInterface;
use crate::container::{ComponentContainer, WeakComponentContainer};
use ioc_domain::constants::CONTAINER_SUBJECT;
use ioc_domain::{Error, Result};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

fn upgrade(container: &WeakComponentContainer) -> Result<ComponentContainer> {
    container
        .upgrade()
        .ok_or_else(|| Error::disposed(CONTAINER_SUBJECT))
}

/// Deferred resolution of exactly one provider of `I`
pub struct Deferred<I: ComponentInterface + ?Sized> {
    container: WeakComponentContainer,
    _interface: PhantomData<fn() -> Arc<I>>,
}

impl<I: ComponentInterface + ?Sized> Deferred<I> {
    pub(crate) fn new(container: WeakComponentContainer) -> Self {
        Self {
            container,
            _interface: PhantomData,
        }
    }

    /// Resolve `I` now
    ///
    /// Fails like `ComponentContainer::resolve_instance`, or with
    /// `Error::Disposed` once the container is gone.
    pub fn get(&self) -> Result<Arc<I>> {
        upgrade(&self.container)?.resolve_instance::<I>()
    }

    /// Resolve `I` now, returning `None` when nothing provides it
    pub fn try_get(&self) -> Result<Option<Arc<I>>> {
        upgrade(&self.container)?.try_resolve_instance::<I>()
    }
}

impl<I: ComponentInterface + ?Sized> Clone for Deferred<I> {
    fn clone(&self) -> Self {
        Self::new(self.container.clone())
    }
}

impl<I: ComponentInterface + ?Sized> fmt::Debug for Deferred<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("interface", &std::any::type_name::<I>())
            .finish_non_exhaustive()
    }
}

/// Deferred resolution of every provider of `I`
pub struct DeferredAll<I: ComponentInterface + ?Sized> {
    container: WeakComponentContainer,
    _interface: PhantomData<fn() -> Arc<I>>,
}

impl<I: ComponentInterface + ?Sized> DeferredAll<I> {
    pub(crate) fn new(container: WeakComponentContainer) -> Self {
        Self {
            container,
            _interface: PhantomData,
        }
    }

    /// Resolve every provider of `I` now
    pub fn get(&self) -> Result<Vec<Arc<I>>> {
        upgrade(&self.container)?.resolve_instances::<I>()
    }
}

impl<I: ComponentInterface + ?Sized> Clone for DeferredAll<I> {
    fn clone(&self) -> Self {
        Self::new(self.container.clone())
    }
}

impl<I: ComponentInterface + ?Sized> fmt::Debug for DeferredAll<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredAll")
            .field("interface", &std::any::type_name::<I>())
            .finish_non_exhaustive()
    }
}
