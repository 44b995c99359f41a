//! Component and interface marker traits
//!
//! A type becomes eligible for registration by implementing [`Component`];
//! a type becomes resolvable by implementing [`ComponentInterface`]. Both
//! checks happen at compile time, so a resolve request for a type that is
//! not a component interface does not build.

use ioc_domain::{BoxError, TypeKey};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Base trait for component implementation types.
///
/// `dispose` is called exactly once, when the last container referencing the
/// instance releases it. The default does nothing.
///
/// ```rust
/// use ioc_container::{BoxError, Component};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct Connection {
///     open: AtomicBool,
/// }
///
/// impl Component for Connection {
///     fn dispose(&self) -> Result<(), BoxError> {
///         self.open.store(false, Ordering::SeqCst);
///         Ok(())
///     }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Release resources held by this instance
    fn dispose(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Marker for types that can be requested from a container.
///
/// Usually implemented for `dyn Trait` types, where the trait itself has
/// `Send + Sync` as supertraits:
///
/// ```rust
/// use ioc_container::ComponentInterface;
///
/// trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// impl ComponentInterface for dyn Clock {}
/// ```
pub trait ComponentInterface: Send + Sync + 'static {}

/// Implement [`ComponentInterface`] for one or more types.
///
/// ```rust
/// trait Clock: Send + Sync {}
/// trait Storage: Send + Sync {}
///
/// ioc_container::component_interface!(dyn Clock, dyn Storage);
/// ```
#[macro_export]
macro_rules! component_interface {
    ($($interface:ty),+ $(,)?) => {
        $(impl $crate::ComponentInterface for $interface {})+
    };
}

/// A constructed component with its concrete type erased.
///
/// Holds the concrete `Arc<T>`; interface views are produced from it by the
/// casters registered on the descriptor.
#[derive(Clone)]
pub struct ComponentObject {
    inner: Arc<dyn Any + Send + Sync>,
    implementation: TypeKey,
}

impl ComponentObject {
    pub(crate) fn new<T: Component>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            implementation: TypeKey::of::<T>(),
        }
    }

    /// Concrete type of the wrapped component
    pub fn implementation(&self) -> TypeKey {
        self.implementation
    }

    /// Typed access to the concrete component
    pub fn downcast<T: Component>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Whether both handles point at the same component
    pub fn ptr_eq(&self, other: &ComponentObject) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ComponentObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentObject")
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}
