//! Instance scope value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value Object: Component Lifetime Scope
///
/// Declares how many instances of a component exist and who shares them.
///
/// ## Business Rules
///
/// - `Container`: one instance per container that resolves it
/// - `Repository`: one instance per registering repository, shared by every
///   container built on that repository
/// - `Global`: one instance per implementation type for the whole process,
///   shared across repositories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceScope {
    /// One instance per resolving container
    #[default]
    Container,
    /// One instance per repository
    Repository,
    /// One instance per implementation type, process-wide
    Global,
}

impl InstanceScope {
    /// Stable lowercase name used in configuration and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Repository => "repository",
            Self::Global => "global",
        }
    }

    /// Whether instances of this scope can be referenced by more than one container
    pub fn is_shared(&self) -> bool {
        !matches!(self, Self::Container)
    }
}

impl fmt::Display for InstanceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "container" | "simple" => Ok(Self::Container),
            "repository" | "shared" => Ok(Self::Repository),
            "global" | "singleton" => Ok(Self::Global),
            _ => Err(format!("Unknown instance scope: {}", s)),
        }
    }
}
