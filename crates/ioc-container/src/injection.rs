//! Constructor parameter injection
//!
//! Every constructor argument type implements [`Injectable`]. The trait
//! reports the parameter's [`ParameterKind`], used to decide whether a
//! constructor is satisfiable, and produces the value from the active
//! [`ConstructionContext`].

use crate::component::ComponentInterface;
use crate::container::ComponentContainer;
use crate::deferred::{Deferred, DeferredAll};
use crate::descriptor::ComponentDescriptor;
use crate::instance::ComponentInstance;
use crate::repository::ComponentRepository;
use ioc_domain::{Error, Result, TypeKey};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Declared kind of one constructor parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// `Arc<I>`: exactly one provider of `I`
    Interface(TypeKey),
    /// `Deferred<I>`: resolves `I` when called
    Deferred(TypeKey),
    /// `Vec<Arc<I>>`: every provider of `I`, possibly none
    Array(TypeKey),
    /// `DeferredAll<I>`: resolves every provider of `I` when called
    DeferredArray(TypeKey),
    /// The resolving container
    Container,
    /// The private repository if one was registered, else the owning repository
    Repository,
    /// The configuration object registered with the component
    Config(TypeKey),
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(key) => write!(f, "Arc<{}>", key.short_name()),
            Self::Deferred(key) => write!(f, "Deferred<{}>", key.short_name()),
            Self::Array(key) => write!(f, "Vec<Arc<{}>>", key.short_name()),
            Self::DeferredArray(key) => write!(f, "DeferredAll<{}>", key.short_name()),
            Self::Container => f.write_str("ComponentContainer"),
            Self::Repository => f.write_str("ComponentRepository"),
            Self::Config(key) => write!(f, "Config<{}>", key.short_name()),
        }
    }
}

/// State for one constructor invocation
///
/// Records the instances resolved directly for the constructor so that the
/// constructed wrapper knows what it depends on.
pub struct ConstructionContext<'a> {
    container: &'a ComponentContainer,
    descriptor: &'a Arc<ComponentDescriptor>,
    progress: Option<&'a dyn Fn(&str)>,
    dependencies: Vec<Arc<dyn ComponentInstance>>,
}

impl<'a> ConstructionContext<'a> {
    pub(crate) fn new(
        container: &'a ComponentContainer,
        descriptor: &'a Arc<ComponentDescriptor>,
        progress: Option<&'a dyn Fn(&str)>,
    ) -> Self {
        Self {
            container,
            descriptor,
            progress,
            dependencies: Vec::new(),
        }
    }

    /// The container performing the construction
    pub fn container(&self) -> &ComponentContainer {
        self.container
    }

    /// Descriptor of the component being constructed
    pub fn descriptor(&self) -> &ComponentDescriptor {
        self.descriptor
    }

    /// Declared name of the component being constructed
    pub fn component_name(&self) -> &str {
        self.descriptor.name()
    }

    /// Resolve exactly one provider of `I` as a direct dependency
    pub fn resolve<I: ComponentInterface + ?Sized>(&mut self) -> Result<Arc<I>> {
        let (value, instance) = self.container.resolve_dependency::<I>(self.progress)?;
        self.dependencies.extend(instance);
        Ok(value)
    }

    /// Resolve every provider of `I` as direct dependencies
    pub fn resolve_all<I: ComponentInterface + ?Sized>(&mut self) -> Result<Vec<Arc<I>>> {
        let resolved = self.container.resolve_dependencies::<I>(self.progress)?;
        let mut values = Vec::with_capacity(resolved.len());
        for (value, instance) in resolved {
            self.dependencies.extend(instance);
            values.push(value);
        }
        Ok(values)
    }

    /// Repository injected into `ComponentRepository` parameters
    pub fn repository(&self) -> Result<ComponentRepository> {
        self.descriptor.injection_repository().ok_or_else(|| {
            Error::internal(format!(
                "owning repository of {} is no longer alive",
                self.descriptor.name()
            ))
        })
    }

    /// Configuration object registered with the component, if it has type `C`
    pub fn config<C: Send + Sync + 'static>(&self) -> Result<Arc<C>> {
        self.descriptor.config::<C>().ok_or_else(|| {
            Error::internal(format!(
                "{} was not registered with a configuration of type {}",
                self.descriptor.name(),
                std::any::type_name::<C>()
            ))
        })
    }

    pub(crate) fn into_dependencies(self) -> Vec<Arc<dyn ComponentInstance>> {
        self.dependencies
    }
}

/// A value the container can supply as a constructor argument
pub trait Injectable: Sized + 'static {
    /// Kind reported for constructor selection and diagnostics
    fn parameter() -> ParameterKind;

    /// Produce the argument
    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self>;
}

impl<I: ComponentInterface + ?Sized> Injectable for Arc<I> {
    fn parameter() -> ParameterKind {
        ParameterKind::Interface(TypeKey::of::<I>())
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        context.resolve::<I>()
    }
}

impl<I: ComponentInterface + ?Sized> Injectable for Vec<Arc<I>> {
    fn parameter() -> ParameterKind {
        ParameterKind::Array(TypeKey::of::<I>())
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        context.resolve_all::<I>()
    }
}

impl<I: ComponentInterface + ?Sized> Injectable for Deferred<I> {
    fn parameter() -> ParameterKind {
        ParameterKind::Deferred(TypeKey::of::<I>())
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        Ok(Deferred::new(context.container().downgrade()))
    }
}

impl<I: ComponentInterface + ?Sized> Injectable for DeferredAll<I> {
    fn parameter() -> ParameterKind {
        ParameterKind::DeferredArray(TypeKey::of::<I>())
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        Ok(DeferredAll::new(context.container().downgrade()))
    }
}

impl Injectable for ComponentContainer {
    fn parameter() -> ParameterKind {
        ParameterKind::Container
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        Ok(context.container().clone())
    }
}

impl Injectable for ComponentRepository {
    fn parameter() -> ParameterKind {
        ParameterKind::Repository
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        context.repository()
    }
}

/// Configuration object registered with the component via `with_config`
pub struct Config<C> {
    value: Arc<C>,
}

impl<C> Config<C> {
    /// The shared configuration value
    pub fn into_inner(self) -> Arc<C> {
        self.value
    }
}

impl<C> Clone for Config<C> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
        }
    }
}

impl<C> Deref for Config<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.value
    }
}

impl<C: fmt::Debug> fmt::Debug for Config<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Config").field(&self.value).finish()
    }
}

impl<C: Send + Sync + 'static> Injectable for Config<C> {
    fn parameter() -> ParameterKind {
        ParameterKind::Config(TypeKey::of::<C>())
    }

    fn inject(context: &mut ConstructionContext<'_>) -> Result<Self> {
        Ok(Self {
            value: context.config::<C>()?,
        })
    }
}
