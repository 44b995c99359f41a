//! # Component Container
//!
//! A dependency-injection runtime that resolves component interfaces to
//! concrete instances, constructs dependencies recursively, detects
//! construction cycles and disposes instances in dependency order.
//!
//! ## Building blocks
//!
//! | Type | Role |
//! |------|------|
//! | [`ComponentDefinition`] | Builder describing one implementation type |
//! | [`ComponentDescriptor`] | Immutable registered metadata for a component |
//! | [`ComponentRepository`] | Registry of descriptors, optionally chained to a parent |
//! | [`ComponentContainer`] | Resolution engine and owner of per-container instances |
//! | [`ComponentInstance`] | Lifetime strategy: [`SimpleInstance`], [`SharedInstance`], [`SingletonInstance`] |
//!
//! ## Example
//!
//! ```rust
//! use ioc_container::{
//!     Component, ComponentContainer, ComponentDefinition, ComponentInterface,
//!     ComponentRepository, InstanceScope,
//! };
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//! impl ComponentInterface for dyn Greeter {}
//!
//! struct English;
//! impl Component for English {}
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let repository = ComponentRepository::new();
//! repository.add_component(
//!     ComponentDefinition::<English>::new()
//!         .provides::<dyn Greeter>(|c| c as Arc<dyn Greeter>)
//!         .scope(InstanceScope::Container)
//!         .constructor(|| English),
//! )?;
//!
//! let container = ComponentContainer::new(repository);
//! let greeter = container.resolve_instance::<dyn Greeter>()?;
//! assert_eq!(greeter.greet(), "hello");
//! container.dispose()?;
//! # Ok::<(), ioc_container::Error>(())
//! ```

pub mod component;
pub mod container;
pub mod deferred;
pub mod definition;
pub mod descriptor;
pub mod injection;
pub mod instance;
pub mod repository;

pub use component::{Component, ComponentInterface, ComponentObject};
pub use container::{
    ComponentContainer, ComponentContainerBuilder, ContainerId, WeakComponentContainer,
};
pub use deferred::{Deferred, DeferredAll};
pub use definition::{ComponentDefinition, Constructor, IntoConstructor, IntoFallibleConstructor};
pub use descriptor::{ComponentDescriptor, DescriptorId};
pub use injection::{Config, ConstructionContext, Injectable, ParameterKind};
pub use instance::{
    ComponentInstance, InstanceStatus, SharedInstance, SimpleInstance, SingletonInstance,
    SingletonRegistry,
};
pub use repository::{ComponentRepository, WeakComponentRepository};

pub use ioc_domain::{BoxError, ContainerSettings, Error, InstanceScope, Result, TypeKey};
