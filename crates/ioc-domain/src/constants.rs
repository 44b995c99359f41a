//! Domain layer constants
//!
//! Defaults that the runtime and the configuration layer must agree on.

// ============================================================================
// RESOLUTION CONSTANTS
// ============================================================================

/// Default maximum depth of the resolve stack for a single resolution
pub const DEFAULT_MAX_RESOLVE_DEPTH: usize = 64;

/// Separator used when rendering a recursion chain
pub const RESOLVE_CHAIN_SEPARATOR: &str = " -> ";

// ============================================================================
// DIAGNOSTIC CONSTANTS
// ============================================================================

/// Subject name used in use-after-dispose errors raised by containers
pub const CONTAINER_SUBJECT: &str = "component container";
