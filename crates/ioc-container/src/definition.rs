//! Component definitions and constructor registration
//!
//! A [`ComponentDefinition`] is the builder form of a descriptor. It names
//! the implementation type, the interfaces it provides, its scope, optional
//! configuration and private repository, and one or more constructors.
//!
//! Constructors are plain closures whose arguments implement
//! [`Injectable`]. The argument types double as the constructor's declared
//! parameter list, which the container inspects to decide whether a
//! constructor can be satisfied before invoking it.

use crate::component::{Component, ComponentInterface, ComponentObject};
use crate::descriptor::{
    Caster, ComponentConfig, ComponentDescriptor, DescriptorId, InterfaceBinding,
};
use crate::injection::{ConstructionContext, Injectable, ParameterKind};
use crate::repository::{ComponentRepository, WeakComponentRepository};
use ioc_domain::{BoxError, Error, InstanceScope, Result, TypeKey};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type BuildFn = Arc<dyn Fn(&mut ConstructionContext<'_>) -> Result<ComponentObject> + Send + Sync>;

/// A registered constructor: its declared parameters and the closure building the component
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<ParameterKind>,
    build: BuildFn,
}

impl Constructor {
    fn new<F>(parameters: Vec<ParameterKind>, build: F) -> Self
    where
        F: Fn(&mut ConstructionContext<'_>) -> Result<ComponentObject> + Send + Sync + 'static,
    {
        Self {
            parameters,
            build: Arc::new(build),
        }
    }

    /// Declared parameters in call order
    pub fn parameters(&self) -> &[ParameterKind] {
        &self.parameters
    }

    /// Number of declared parameters
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Parameter list rendered for diagnostics, e.g. `(Arc<dyn Storage>, ComponentContainer)`
    pub fn signature(&self) -> String {
        let parameters = self
            .parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        format!("({})", parameters.join(", "))
    }

    pub(crate) fn invoke(&self, context: &mut ConstructionContext<'_>) -> Result<ComponentObject> {
        (self.build)(context)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.signature()).finish()
    }
}

/// Conversion of an infallible closure into a [`Constructor`] for `T`
pub trait IntoConstructor<T, Args> {
    /// Build the constructor
    fn into_constructor(self) -> Constructor;
}

/// Conversion of a closure returning `Result<T, BoxError>` into a [`Constructor`] for `T`
pub trait IntoFallibleConstructor<T, Args> {
    /// Build the constructor
    fn into_constructor(self) -> Constructor;
}

macro_rules! impl_constructors {
    ($($ty:ident $arg:ident),*) => {
        impl<F, T, $($ty,)*> IntoConstructor<T, ($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> T + Send + Sync + 'static,
            T: Component,
            $($ty: Injectable,)*
        {
            #[allow(unused_variables)]
            fn into_constructor(self) -> Constructor {
                Constructor::new(vec![$($ty::parameter()),*], move |context| {
                    $(let $arg = $ty::inject(context)?;)*
                    Ok(ComponentObject::new(self($($arg),*)))
                })
            }
        }

        impl<F, T, $($ty,)*> IntoFallibleConstructor<T, ($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> std::result::Result<T, BoxError> + Send + Sync + 'static,
            T: Component,
            $($ty: Injectable,)*
        {
            #[allow(unused_variables)]
            fn into_constructor(self) -> Constructor {
                Constructor::new(vec![$($ty::parameter()),*], move |context| {
                    $(let $arg = $ty::inject(context)?;)*
                    let component = self($($arg),*)
                        .map_err(|source| Error::construction(context.component_name(), source))?;
                    Ok(ComponentObject::new(component))
                })
            }
        }
    };
}

impl_constructors!();
impl_constructors!(A1 a1);
impl_constructors!(A1 a1, A2 a2);
impl_constructors!(A1 a1, A2 a2, A3 a3);
impl_constructors!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_constructors!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_constructors!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_constructors!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_constructors!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);

fn dispose_component<T: Component>(object: &ComponentObject) -> std::result::Result<(), BoxError> {
    match object.downcast::<T>() {
        Some(component) => component.dispose(),
        None => Err(format!(
            "component object is {}, expected {}",
            object.implementation(),
            std::any::type_name::<T>()
        )
        .into()),
    }
}

/// Builder describing how to register implementation type `T`.
///
/// ```rust
/// use ioc_container::{Component, ComponentDefinition, ComponentInterface, Config, InstanceScope};
/// use std::sync::Arc;
///
/// trait Storage: Send + Sync {}
/// impl ComponentInterface for dyn Storage {}
///
/// struct DiskSettings {
///     root: String,
/// }
///
/// struct DiskStorage {
///     root: String,
/// }
/// impl Component for DiskStorage {}
/// impl Storage for DiskStorage {}
///
/// let definition = ComponentDefinition::<DiskStorage>::new()
///     .named("disk")
///     .provides::<dyn Storage>(|c| c as Arc<dyn Storage>)
///     .scope(InstanceScope::Repository)
///     .with_config(DiskSettings { root: "/var/data".to_string() })
///     .constructor(|settings: Config<DiskSettings>| DiskStorage {
///         root: settings.root.clone(),
///     });
/// ```
pub struct ComponentDefinition<T: Component> {
    name: Option<String>,
    interfaces: Vec<InterfaceBinding>,
    scope: InstanceScope,
    config: Option<ComponentConfig>,
    private_repository: Option<ComponentRepository>,
    constructors: Vec<Constructor>,
    _component: PhantomData<fn() -> T>,
}

impl<T: Component> ComponentDefinition<T> {
    /// Start a definition with container scope and no interfaces
    pub fn new() -> Self {
        Self {
            name: None,
            interfaces: Vec::new(),
            scope: InstanceScope::default(),
            config: None,
            private_repository: None,
            constructors: Vec::new(),
            _component: PhantomData,
        }
    }

    /// Set the declared component name (defaults to the short type name)
    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Register `T` as a provider of interface `I`
    ///
    /// The caster converts the concrete instance into the interface view,
    /// typically `|c| c as Arc<dyn Trait>`.
    pub fn provides<I>(mut self, cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static) -> Self
    where
        I: ComponentInterface + ?Sized,
    {
        let caster: Caster = Arc::new(move |object: &ComponentObject| {
            object
                .downcast::<T>()
                .map(|concrete| Box::new(cast(concrete)) as Box<dyn Any + Send + Sync>)
        });
        self.interfaces.push(InterfaceBinding {
            key: TypeKey::of::<I>(),
            caster,
        });
        self
    }

    /// Set the lifetime scope
    pub fn scope(mut self, scope: InstanceScope) -> Self {
        self.scope = scope;
        self
    }

    /// Attach a configuration object, injectable as `Config<C>`
    pub fn with_config<C: Send + Sync + 'static>(mut self, config: C) -> Self {
        self.config = Some(ComponentConfig {
            key: TypeKey::of::<C>(),
            value: Arc::new(config),
        });
        self
    }

    /// Attach a private repository, injected instead of the owning repository
    pub fn with_private_repository(mut self, repository: ComponentRepository) -> Self {
        self.private_repository = Some(repository);
        self
    }

    /// Add an infallible constructor
    pub fn constructor<Args, F: IntoConstructor<T, Args>>(mut self, constructor: F) -> Self {
        self.constructors.push(constructor.into_constructor());
        self
    }

    /// Add a constructor returning `Result<T, BoxError>`
    pub fn try_constructor<Args, F: IntoFallibleConstructor<T, Args>>(
        mut self,
        constructor: F,
    ) -> Self {
        self.constructors.push(constructor.into_constructor());
        self
    }

    pub(crate) fn into_descriptor(
        self,
        owner: WeakComponentRepository,
    ) -> Result<ComponentDescriptor> {
        let implementation = TypeKey::of::<T>();
        if self.interfaces.is_empty() {
            return Err(Error::registration(
                implementation.name(),
                "component does not provide any interface",
            ));
        }
        if self.constructors.is_empty() {
            return Err(Error::registration(
                implementation.name(),
                "component has no constructors",
            ));
        }
        let mut seen = HashSet::new();
        for binding in &self.interfaces {
            if !seen.insert(binding.key) {
                return Err(Error::registration(
                    implementation.name(),
                    format!("interface {} is declared more than once", binding.key),
                ));
            }
        }

        Ok(ComponentDescriptor {
            id: DescriptorId::next(),
            name: self.name.unwrap_or_else(|| implementation.short_name()),
            implementation,
            interfaces: self.interfaces,
            scope: self.scope,
            config: self.config,
            private_repository: self.private_repository,
            owner,
            constructors: self.constructors,
            disposer: dispose_component::<T>,
        })
    }
}

impl<T: Component> Default for ComponentDefinition<T> {
    fn default() -> Self {
        Self::new()
    }
}
