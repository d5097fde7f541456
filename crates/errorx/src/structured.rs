//! The capability set shared by every composable error.
//!
//! Domain errors hold a [`ComposableError`] and implement [`Compose`] to
//! expose it; the blanket impl below then provides [`StructuredError`] by
//! forwarding every accessor. The domain type only supplies its own
//! `Display` (and the `Debug` + `Error` impls the standard library needs).
//!
//! ```rust
//! use std::fmt;
//! use errorx::{ComposableError, Compose, StructuredError};
//!
//! #[derive(Debug)]
//! struct ConfigError(ComposableError);
//!
//! impl Compose for ConfigError {
//!     fn base(&self) -> &ComposableError { &self.0 }
//!     fn base_mut(&mut self) -> &mut ComposableError { &mut self.0 }
//! }
//!
//! impl fmt::Display for ConfigError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "config: {} (code={})", self.internal_error(), self.code())
//!     }
//! }
//!
//! impl std::error::Error for ConfigError {}
//!
//! let err = ConfigError(ComposableError::new(12, Some("missing [server] table")));
//! assert_eq!(err.to_string(), "config: missing [server] table (code=12)");
//! ```

use std::error::Error;
use std::sync::Arc;

use crate::{Attrs, Code, ComposableError};

/// A nested error as held by its parent.
pub type Nested = Arc<dyn StructuredError>;

/// Read access to everything a composable error carries.
pub trait StructuredError: Error + Send + Sync {
    fn code(&self) -> Code;

    /// File of the construction site, `""` when caller capture was not requested.
    fn file(&self) -> &str;

    /// Line of the construction site, `0` when unknown.
    fn line(&self) -> u32;

    /// Fully qualified function of the construction site.
    fn method(&self) -> &str;

    /// The wrapped cause. Never absent.
    fn internal_error(&self) -> &(dyn Error + Send + Sync + 'static);

    fn attrs(&self) -> &Attrs;

    fn nested_errors(&self) -> &[Nested];
}

/// Gives access to the embedded [`ComposableError`] of a domain error.
pub trait Compose {
    fn base(&self) -> &ComposableError;

    fn base_mut(&mut self) -> &mut ComposableError;
}

impl Compose for ComposableError {
    fn base(&self) -> &ComposableError {
        self
    }

    fn base_mut(&mut self) -> &mut ComposableError {
        self
    }
}

impl<T> StructuredError for T
where
    T: Compose + Error + Send + Sync,
{
    fn code(&self) -> Code {
        self.base().code()
    }

    fn file(&self) -> &str {
        self.base().file()
    }

    fn line(&self) -> u32 {
        self.base().line()
    }

    fn method(&self) -> &str {
        self.base().method()
    }

    fn internal_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.base().internal_error()
    }

    fn attrs(&self) -> &Attrs {
        self.base().attrs()
    }

    fn nested_errors(&self) -> &[Nested] {
        self.base().nested_errors()
    }
}
