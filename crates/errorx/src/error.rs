use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::attr::{AttrError, AttrValue, Attrs, FromAttr};
use crate::caller::{Caller, FrameLookup, StackWalker};
use crate::structured::{Nested, StructuredError};
use crate::Result;

/// Integer error code. Caller-defined, never validated.
pub type Code = i64;

/// The underlying error a [`ComposableError`] wraps.
pub type Cause = Box<dyn Error + Send + Sync + 'static>;

/// Cause substituted when an error is built without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an unknown error occurred (code={code})")]
pub struct UnknownError {
    pub code: Code,
}

/// Base error carrying a code, a cause, typed attributes, nested errors and
/// optional caller metadata.
///
/// Build it with [`new`](Self::new) or [`with_caller`](Self::with_caller),
/// then attach context in place:
///
/// ```rust
/// use errorx::ComposableError;
///
/// let mut err = ComposableError::new(503, Some("upstream unavailable"));
/// err.with_attr("host", "db-1").with_attr("attempts", 3);
///
/// assert_eq!(err.attr_string("host"), Ok("db-1"));
/// assert_eq!(err.attr_int("attempts"), Ok(3));
/// assert_eq!(err.to_string(), "error: upstream unavailable");
/// ```
///
/// Mutation takes `&mut self`; share an error across threads only behind
/// your own synchronisation if it still needs to change.
pub struct ComposableError {
    code: Code,
    cause: Cause,
    attrs: Attrs,
    nested: Vec<Nested>,
    caller: Caller,
}

// ── Constructors ──────────────────────────────────────────────────

impl ComposableError {
    /// Build an error without caller information.
    ///
    /// A `None` cause is replaced by an [`UnknownError`] carrying `code`.
    pub fn new<E>(code: Code, cause: Option<E>) -> Self
    where
        E: Into<Cause>,
    {
        Self {
            code,
            cause: resolve_cause(code, cause),
            attrs: Attrs::new(),
            nested: Vec::new(),
            caller: Caller::NotRequested,
        }
    }

    /// Build an error with no cause of its own.
    pub fn from_code(code: Code) -> Self {
        Self::new(code, None::<Cause>)
    }

    /// Build an error and record the location of the code that called this
    /// constructor.
    ///
    /// `skip` moves the recorded frame further out: wrappers that build a
    /// domain error around this one pass `1` so that their own caller is
    /// recorded. Without line tables only the function name resolves and the
    /// file and line read [`UNKNOWN_FRAME`](crate::UNKNOWN_FRAME) and `0`; if
    /// no frame is found at all the method reads `UNKNOWN_FRAME` too.
    #[inline(never)]
    pub fn with_caller<E>(code: Code, cause: Option<E>, skip: usize) -> Self
    where
        E: Into<Cause>,
    {
        Self::with_caller_from(code, cause, skip, &StackWalker)
    }

    /// Like [`with_caller`](Self::with_caller) with a caller-supplied frame lookup.
    #[inline(never)]
    pub fn with_caller_from<E, L>(code: Code, cause: Option<E>, skip: usize, lookup: &L) -> Self
    where
        E: Into<Cause>,
        L: FrameLookup + ?Sized,
    {
        let mut err = Self::new(code, cause);
        err.caller = Caller::capture(code, skip, lookup);
        err
    }
}

fn resolve_cause<E: Into<Cause>>(code: Code, cause: Option<E>) -> Cause {
    match cause {
        Some(cause) => cause.into(),
        None => Box::new(UnknownError { code }),
    }
}

// ── Identity and caller ───────────────────────────────────────────

impl ComposableError {
    pub fn code(&self) -> Code {
        self.code
    }

    pub fn file(&self) -> &str {
        self.caller.file()
    }

    pub fn line(&self) -> u32 {
        self.caller.line()
    }

    pub fn method(&self) -> &str {
        self.caller.method()
    }

    /// Whether caller capture was requested and whether it succeeded.
    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    /// The wrapped cause. Never absent.
    pub fn internal_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }
}

// ── Attributes ────────────────────────────────────────────────────

impl ComposableError {
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Result<&AttrValue> {
        self.attrs.get(key).ok_or_else(|| AttrError::NotFound {
            key: key.to_owned(),
        })
    }

    /// Read an attribute narrowed to `T`.
    ///
    /// A missing key is [`AttrError::NotFound`]; a value of another type is
    /// [`AttrError::TypeMismatch`].
    pub fn attr_as<'a, T>(&'a self, key: &str) -> Result<T>
    where
        T: FromAttr<'a>,
    {
        let value = self.attr(key)?;
        T::from_attr(value).ok_or_else(|| AttrError::TypeMismatch {
            key: key.to_owned(),
            expected: T::TYPE_NAME,
            found: value.type_name(),
        })
    }

    pub fn attr_int(&self, key: &str) -> Result<isize> {
        self.attr_as(key)
    }

    pub fn attr_int64(&self, key: &str) -> Result<i64> {
        self.attr_as(key)
    }

    pub fn attr_uint(&self, key: &str) -> Result<usize> {
        self.attr_as(key)
    }

    pub fn attr_uint64(&self, key: &str) -> Result<u64> {
        self.attr_as(key)
    }

    pub fn attr_string(&self, key: &str) -> Result<&str> {
        self.attr_as(key)
    }

    pub fn attr_time(&self, key: &str) -> Result<DateTime<Utc>> {
        self.attr_as(key)
    }

    pub fn attr_duration(&self, key: &str) -> Result<Duration> {
        self.attr_as(key)
    }

    pub fn attr_bool(&self, key: &str) -> Result<bool> {
        self.attr_as(key)
    }

    pub fn attr_f64(&self, key: &str) -> Result<f64> {
        self.attr_as(key)
    }

    /// Set one attribute, replacing any previous value of any type.
    pub fn with_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set several attributes. Later entries win over earlier ones and over
    /// values already present.
    pub fn with_attrs<I, K, V>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttrValue>,
    {
        self.attrs
            .extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

// ── Nested errors ─────────────────────────────────────────────────

impl ComposableError {
    pub fn nested_errors(&self) -> &[Nested] {
        &self.nested
    }

    /// Append errors in iteration order, skipping `None` entries.
    ///
    /// No cycle detection is done; an error must not end up nested in itself.
    pub fn append<I>(&mut self, errs: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<Option<Nested>>,
    {
        self.nested
            .extend(errs.into_iter().filter_map(Into::<Option<Nested>>::into));
        self
    }

    /// Append a single error by value.
    pub fn push<E>(&mut self, err: E) -> &mut Self
    where
        E: StructuredError + 'static,
    {
        self.nested.push(Arc::new(err));
        self
    }
}

// ── Rendering ─────────────────────────────────────────────────────

impl fmt::Display for ComposableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.cause)
    }
}

impl fmt::Debug for ComposableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ComposableError");
        d.field("code", &self.code);
        d.field("cause", &self.cause.to_string());
        if !self.attrs.is_empty() {
            d.field("attrs", &self.attrs);
        }
        if !self.nested.is_empty() {
            d.field("nested", &self.nested);
        }
        if self.caller.is_requested() {
            d.field("caller", &self.caller);
        }
        d.finish()
    }
}

impl Error for ComposableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause.as_ref())
    }
}
