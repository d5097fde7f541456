//! Caller capture.
//!
//! A [`Caller`] records where a [`ComposableError`](crate::ComposableError)
//! was built. Capture goes through the [`FrameLookup`] trait; the default
//! implementation, [`StackWalker`], resolves symbols with the `backtrace`
//! crate. Function names resolve from the symbol table; file and line need
//! line tables in the binary.

use std::fmt;
use std::path::Path;

use crate::Code;

/// Placeholder used for the file and function of a capture that failed.
pub const UNKNOWN_FRAME: &str = "????";

/// Path prefix of every function in this crate. Frames under it are part of
/// the capture machinery and never reported as the caller.
const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");

/// A resolved stack frame.
///
/// Without line tables (release builds by default) only the function name
/// resolves; `file` is then [`UNKNOWN_FRAME`] and `line` is `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.file, self.line, self.function)
    }
}

/// Caller metadata attached to an error.
///
/// The flat accessors ([`file`](Caller::file), [`line`](Caller::line),
/// [`method`](Caller::method)) report `""`/`0` when capture was never
/// requested and [`UNKNOWN_FRAME`]/`0` when it was requested but failed.
/// Match on the enum to tell the two apart without relying on those values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Caller {
    #[default]
    NotRequested,
    Unavailable,
    Resolved(Frame),
}

impl Caller {
    pub fn file(&self) -> &str {
        match self {
            Caller::NotRequested => "",
            Caller::Unavailable => UNKNOWN_FRAME,
            Caller::Resolved(frame) => &frame.file,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            Caller::Resolved(frame) => frame.line,
            Caller::NotRequested | Caller::Unavailable => 0,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            Caller::NotRequested => "",
            Caller::Unavailable => UNKNOWN_FRAME,
            Caller::Resolved(frame) => &frame.function,
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Caller::Resolved(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn is_requested(&self) -> bool {
        !matches!(self, Caller::NotRequested)
    }

    pub(crate) fn capture(code: Code, skip: usize, lookup: &(impl FrameLookup + ?Sized)) -> Self {
        match lookup.lookup(skip) {
            Some(frame) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(code, skip, caller = %frame, "resolved error caller");
                Caller::Resolved(frame)
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(code, skip, "caller frame lookup failed");
                Caller::Unavailable
            }
        }
    }
}

/// Call-stack introspection used by caller-capturing construction.
pub trait FrameLookup {
    /// Returns the frame `skip` levels above the code that invoked the
    /// capturing constructor, or `None` if no such frame exists.
    ///
    /// `skip == 0` is the function that called the constructor.
    fn lookup(&self, skip: usize) -> Option<Frame>;
}

impl<F> FrameLookup for F
where
    F: Fn(usize) -> Option<Frame>,
{
    fn lookup(&self, skip: usize) -> Option<Frame> {
        self(skip)
    }
}

/// Walks the live call stack with the `backtrace` crate.
///
/// Symbols are visited innermost first, inlined frames included. Everything
/// up to and including the last contiguous frame belonging to this crate is
/// discarded, then `skip` further symbols are dropped. A symbol whose file or
/// line did not resolve still yields a frame carrying its function name.
#[derive(Debug, Clone, Copy, Default)]
pub struct StackWalker;

impl StackWalker {
    pub const fn new() -> Self {
        StackWalker
    }
}

impl FrameLookup for StackWalker {
    #[inline(never)]
    fn lookup(&self, skip: usize) -> Option<Frame> {
        let trace = backtrace::Backtrace::new();
        let symbols = trace
            .frames()
            .iter()
            .flat_map(|frame| frame.symbols())
            .filter_map(|symbol| {
                let name = symbol.name()?;
                Some((format!("{name:#}"), symbol.filename(), symbol.lineno()))
            });
        select_frame(symbols, skip)
    }
}

/// Picks the caller out of `(function, file, line)` symbols listed innermost
/// first: drops everything up to the last frame of this crate, then `skip`
/// more. A symbol whose location did not resolve still yields its name.
fn select_frame<'a, I>(symbols: I, skip: usize) -> Option<Frame>
where
    I: IntoIterator<Item = (String, Option<&'a Path>, Option<u32>)>,
{
    let mut entered = false;
    let mut remaining = skip;

    for (function, file, line) in symbols {
        if is_internal(&function) {
            entered = true;
            continue;
        }
        if !entered {
            continue;
        }
        if remaining > 0 {
            remaining -= 1;
            continue;
        }

        return Some(Frame {
            file: file.map_or_else(|| UNKNOWN_FRAME.to_owned(), |p| p.display().to_string()),
            line: line.unwrap_or(0),
            function,
        });
    }
    None
}

/// True for symbols inside this crate, including trait impls written as
/// `<T as errorx::Trait>::method` and v0-mangled `<errorx::Type>::method`.
fn is_internal(function: &str) -> bool {
    let path = function.trim_start_matches('<');
    path.starts_with(CRATE_PREFIX) || function.contains(&format!(" as {CRATE_PREFIX}"))
}
