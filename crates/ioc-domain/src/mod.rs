//! # Domain Layer
//!
//! Core types shared by the component container runtime and its
//! infrastructure: the error taxonomy and the value objects that describe
//! component lifetimes and type identity.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Typed resolution, registration and lifecycle errors |
//! | [`value_objects`] | `InstanceScope`, `TypeKey`, `ContainerSettings` |
//! | [`constants`] | Defaults shared across layers |

pub mod constants;
pub mod error;
pub mod value_objects;

pub use error::{BoxError, Error, RejectedConstructor, Result};
pub use value_objects::{ContainerSettings, InstanceScope, TypeKey};
