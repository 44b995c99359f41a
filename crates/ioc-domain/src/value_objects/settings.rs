//! Container settings value object

use crate::constants::DEFAULT_MAX_RESOLVE_DEPTH;
use serde::{Deserialize, Serialize};

/// Tunables applied to every container built with them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// Maximum number of nested component constructions in one resolution
    pub max_resolve_depth: usize,

    /// Log every constructed component at info level
    pub log_progress: bool,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            max_resolve_depth: DEFAULT_MAX_RESOLVE_DEPTH,
            log_progress: false,
        }
    }
}
