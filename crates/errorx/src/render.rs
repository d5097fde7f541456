//! Building blocks for rendering composed errors.
//!
//! [`ComposableError`](crate::ComposableError) only renders its cause.
//! Domain errors write their own message and use these helpers for the
//! shared parts: the attribute list and the nested errors, each nested
//! rendering on its own line and indented one tab deeper than its parent.

use std::fmt::{self, Write};

use crate::structured::{Nested, StructuredError};
use crate::{Attrs, UNKNOWN_FRAME};

/// Writes ` [ k1=v1 k2=v2 ]`, or nothing when `attrs` is empty.
pub fn write_attrs<W: Write + ?Sized>(w: &mut W, attrs: &Attrs) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    w.write_str(" [")?;
    for (key, value) in attrs {
        write!(w, " {key}={value}")?;
    }
    w.write_str(" ]")
}

/// Writes each nested error's `Display` on a new line, indented by one tab.
///
/// Multi-line renderings (errors that themselves have nested errors) get
/// every line indented, so depth is preserved through any number of levels.
pub fn write_nested<W: Write + ?Sized>(w: &mut W, nested: &[Nested]) -> fmt::Result {
    for err in nested {
        w.write_str("\n\t")?;
        write!(Indented::new(w), "{err}")?;
    }
    Ok(())
}

/// A `fmt::Write` adapter that prefixes every line after the first with a tab.
pub struct Indented<'a, W: ?Sized> {
    inner: &'a mut W,
}

impl<'a, W: Write + ?Sized> Indented<'a, W> {
    pub fn new(inner: &'a mut W) -> Self {
        Self { inner }
    }
}

impl<W: Write + ?Sized> Write for Indented<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.inner.write_str(first)?;
        }
        for line in lines {
            self.inner.write_str("\n\t")?;
            self.inner.write_str(line)?;
        }
        Ok(())
    }
}

/// Generic full rendering of any [`StructuredError`]:
///
/// ```text
/// <cause> (code=<code>) [ k=v ... ] at <file>:<line> (<method>)
///     <nested 1>
///     <nested 2>
/// ```
///
/// The location is only written for errors whose caller was resolved, even
/// if only the function name was.
/// Nested errors are rendered with their own `Display`, not with `Report`.
pub struct Report<'a, E: ?Sized>(pub &'a E);

impl<E: StructuredError + ?Sized> fmt::Display for Report<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err = self.0;
        write!(f, "{} (code={})", err.internal_error(), err.code())?;
        write_attrs(f, err.attrs())?;
        let method = err.method();
        if !method.is_empty() && method != UNKNOWN_FRAME {
            write!(f, " at {}:{} ({})", err.file(), err.line(), err.method())?;
        }
        write_nested(f, err.nested_errors())
    }
}
