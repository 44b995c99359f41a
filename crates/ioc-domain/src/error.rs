//! Error handling types

use crate::constants::RESOLVE_CHAIN_SEPARATOR;
use std::fmt;
use thiserror::Error;

/// Boxed error returned by fallible component constructors and disposers
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the component container
#[derive(Error, Debug)]
pub enum Error {
    /// A component definition could not be registered
    #[error("Registration error for {component}: {message}")]
    Registration {
        /// Implementation type of the rejected component
        component: String,
        /// Why the registration was rejected
        message: String,
    },

    /// No registered component or external instance provides the interface
    #[error("No component found that implements {interface}")]
    NotFound {
        /// The requested interface
        interface: String,
    },

    /// More than one component provides the interface at the same repository level
    #[error("Multiple components implement {interface}: {}", .implementations.join(", "))]
    Ambiguous {
        /// The requested interface
        interface: String,
        /// Full type names of every candidate implementation
        implementations: Vec<String>,
    },

    /// None of the component's constructors has only satisfiable parameters
    #[error(
        "No suitable constructor found for {component}: {}",
        render_rejected(.rejected)
    )]
    NoSuitableConstructor {
        /// Implementation type of the component
        component: String,
        /// Every constructor with the reasons it was rejected
        rejected: Vec<RejectedConstructor>,
    },

    /// A component was reached twice on the active resolve stack
    #[error(
        "Recursive component resolution detected: {}",
        .chain.join(RESOLVE_CHAIN_SEPARATOR)
    )]
    Recursion {
        /// Component names in resolution order, ending with the repeated one
        chain: Vec<String>,
    },

    /// Operation attempted on something that has already been disposed
    #[error("{subject} has been disposed")]
    Disposed {
        /// What was disposed
        subject: String,
    },

    /// A component constructor returned an error
    #[error("Failed to construct {component}: {source}")]
    Construction {
        /// Name of the component being constructed
        component: String,
        /// The error returned by the constructor
        #[source]
        source: BoxError,
    },

    /// A component's dispose hook returned an error
    #[error("Failed to dispose {component}: {source}")]
    Disposal {
        /// Name of the component being disposed
        component: String,
        /// The error returned by the dispose hook
        #[source]
        source: BoxError,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxError>,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the violated invariant
        message: String,
    },
}

/// A constructor that was considered and rejected during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedConstructor {
    /// Rendered parameter list, e.g. `(Arc<dyn Storage>, Config<Settings>)`
    pub signature: String,
    /// One reason per unsatisfiable parameter
    pub reasons: Vec<String>,
}

impl fmt::Display for RejectedConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.signature, self.reasons.join(", "))
    }
}

fn render_rejected(rejected: &[RejectedConstructor]) -> String {
    if rejected.is_empty() {
        return "no constructors registered".to_string();
    }
    rejected
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// Registration and resolution error creation methods
impl Error {
    /// Create a registration error
    pub fn registration<C: Into<String>, S: Into<String>>(component: C, message: S) -> Self {
        Self::Registration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(interface: S) -> Self {
        Self::NotFound {
            interface: interface.into(),
        }
    }

    /// Create an ambiguous resolution error
    pub fn ambiguous<S: Into<String>>(interface: S, implementations: Vec<String>) -> Self {
        Self::Ambiguous {
            interface: interface.into(),
            implementations,
        }
    }

    /// Create a no suitable constructor error
    pub fn no_suitable_constructor<S: Into<String>>(
        component: S,
        rejected: Vec<RejectedConstructor>,
    ) -> Self {
        Self::NoSuitableConstructor {
            component: component.into(),
            rejected,
        }
    }

    /// Create a recursion error from the ordered chain of component names
    pub fn recursion(chain: Vec<String>) -> Self {
        Self::Recursion { chain }
    }

    /// Create a use-after-dispose error
    pub fn disposed<S: Into<String>>(subject: S) -> Self {
        Self::Disposed {
            subject: subject.into(),
        }
    }

    /// Wrap a constructor failure
    ///
    /// Container errors raised inside a constructor (for example by a
    /// `Deferred` resolved eagerly) are returned unchanged instead of wrapped.
    pub fn construction<S: Into<String>>(component: S, source: BoxError) -> Self {
        match source.downcast::<Error>() {
            Ok(inner) => *inner,
            Err(source) => Self::Construction {
                component: component.into(),
                source,
            },
        }
    }

    /// Wrap a dispose hook failure
    pub fn disposal<S: Into<String>>(component: S, source: BoxError) -> Self {
        Self::Disposal {
            component: component.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }
}

// Classification helpers
impl Error {
    /// Whether this error means the requested interface has no provider
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error is a use-after-dispose error
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed { .. })
    }
}
