//! Error context for foreign errors
//!
//! [`ErrorContext`] turns any `std::error::Error` into the domain [`Error`],
//! prefixing a context message. Component constructors use
//! [`ErrorContext::component_context`] to attribute a failure to the
//! component being built.

use ioc_domain::BoxError;
use ioc_domain::error::{Error, Result};
use std::fmt;

/// Extension trait for adding context to errors
///
/// # Example
///
/// ```rust
/// use ioc_infrastructure::error_ext::ErrorContext;
///
/// fn read(path: &std::path::Path) -> ioc_domain::Result<String> {
///     std::fs::read_to_string(path)
///         .io_context(format!("Failed to read {}", path.display()))
/// }
///
/// assert!(read(std::path::Path::new("/nonexistent/ioc.toml")).is_err());
/// ```
pub trait ErrorContext<T>: Sized {
    /// Wrap the error as `Error::Infrastructure` with a context message
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.with_context(|| context)
    }

    /// Like [`context`](Self::context), building the message only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;

    /// Wrap the error as `Error::Io`
    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Wrap the error as `Error::Configuration`
    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Attribute the error to `component` as `Error::Construction`.
    ///
    /// Container errors pass through unchanged, so a failed lookup made
    /// inside a constructor keeps its original kind.
    fn component_context<S: Into<String>>(self, component: S) -> Result<T>;
}

/// Error kinds a foreign error can be wrapped as
enum Wrap {
    Infrastructure,
    Io,
    Configuration,
}

impl Wrap {
    fn apply(self, context: impl fmt::Display, source: BoxError) -> Error {
        let message = format!("{context}: {source}");
        let source = Some(source);
        match self {
            Self::Infrastructure => Error::Infrastructure { message, source },
            Self::Io => Error::Io { message, source },
            Self::Configuration => Error::Configuration { message, source },
        }
    }
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|err| Wrap::Infrastructure.apply(f(), Box::new(err)))
    }

    fn io_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Wrap::Io.apply(context, Box::new(err)))
    }

    fn config_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|err| Wrap::Configuration.apply(context, Box::new(err)))
    }

    fn component_context<S: Into<String>>(self, component: S) -> Result<T> {
        self.map_err(|err| Error::construction(component, Box::new(err)))
    }
}
