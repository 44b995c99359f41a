//! Domain Value Objects
//!
//! Immutable values describing how components live and how types are
//! identified at runtime.
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`InstanceScope`] | Lifetime scope declared by a component |
//! | [`TypeKey`] | Runtime identity and display name of a Rust type |
//! | [`ContainerSettings`] | Tunables applied to every container |

/// Component lifetime scopes
pub mod scope;
/// Container tunables
pub mod settings;
/// Runtime type identity
pub mod type_key;

pub use scope::InstanceScope;
pub use settings::ContainerSettings;
pub use type_key::TypeKey;
