//! # errorx
//!
//! Composable structured errors. A [`ComposableError`] wraps a cause with an
//! integer code, a map of typed attributes, a list of nested errors and,
//! optionally, the location it was built at.
//!
//! Domain errors embed a `ComposableError`, implement [`Compose`] to expose
//! it, and write their own `Display`. Every such type is a
//! [`StructuredError`], so it can be nested inside any other composed error
//! and inspected without knowing its concrete type.
//!
//! ```rust
//! use std::fmt;
//! use errorx::{render, ComposableError, Compose, StructuredError};
//!
//! #[derive(Debug)]
//! struct StoreError(ComposableError);
//!
//! impl Compose for StoreError {
//!     fn base(&self) -> &ComposableError { &self.0 }
//!     fn base_mut(&mut self) -> &mut ComposableError { &mut self.0 }
//! }
//!
//! impl fmt::Display for StoreError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "store failure: {} (code={})", self.internal_error(), self.code())?;
//!         render::write_attrs(f, self.attrs())?;
//!         render::write_nested(f, self.nested_errors())
//!     }
//! }
//!
//! impl std::error::Error for StoreError {}
//!
//! let mut read = StoreError(ComposableError::new(100, Some("short read")));
//! read.base_mut().with_attr("offset", 4096u64);
//!
//! let mut flush = StoreError(ComposableError::new(101, Some("flush aborted")));
//! flush.base_mut().push(read);
//!
//! assert_eq!(
//!     flush.to_string(),
//!     "store failure: flush aborted (code=101)\n\tstore failure: short read (code=100) [ offset=4096 ]"
//! );
//! ```
//!
//! ## Attributes
//!
//! Attribute reads tell a missing key ([`AttrError::NotFound`]) apart from a
//! value of another type ([`AttrError::TypeMismatch`]). Narrowing is exact:
//! an `i64` attribute is not readable through [`ComposableError::attr_int`].
//!
//! ## Caller capture
//!
//! [`ComposableError::with_caller`] records file, line and function of its
//! caller through the [`FrameLookup`] trait. In a binary without line tables
//! the function name still resolves while file and line read
//! [`UNKNOWN_FRAME`] and `0`. Lookup failure is not an error: all three
//! fields read the placeholder values, and [`ComposableError::caller`]
//! reports [`Caller::Unavailable`].
//!
//! ## Feature Flags
//!
//! | Flag      | Effect |
//! |-----------|--------|
//! | `tracing` | (default) [`trace`] module and internal debug events |

mod attr;
mod caller;
mod error;
#[macro_use]
mod macros;
pub mod render;
mod structured;
#[cfg(feature = "tracing")]
pub mod trace;
#[cfg(all(test, feature = "tracing"))]
mod testing;

pub use attr::{AttrError, AttrValue, Attrs, FromAttr};
pub use caller::{Caller, Frame, FrameLookup, StackWalker, UNKNOWN_FRAME};
pub use error::{Cause, Code, ComposableError, UnknownError};
pub use structured::{Compose, Nested, StructuredError};

/// Result of an attribute read.
pub type Result<T, E = AttrError> = std::result::Result<T, E>;
