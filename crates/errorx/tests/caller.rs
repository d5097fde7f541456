//! Caller capture against the real call stack.
//!
//! File and line assertions rely on line tables being present, which the
//! workspace dev and test profiles keep. Function names resolve without them.

use errorx::{Cause, Caller, ComposableError, Compose, StructuredError, UNKNOWN_FRAME};

#[derive(Debug)]
struct TracedError {
    base: ComposableError,
}

impl TracedError {
    // Skips this constructor so the code calling it is recorded.
    #[inline(never)]
    fn with_caller(code: i64, cause: Option<Cause>) -> Self {
        Self {
            base: ComposableError::with_caller(code, cause, 1),
        }
    }
}

impl Compose for TracedError {
    fn base(&self) -> &ComposableError {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComposableError {
        &mut self.base
    }
}

impl std::fmt::Display for TracedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "traced: {}", self.internal_error())
    }
}

impl std::error::Error for TracedError {}

#[test]
fn direct_capture_records_immediate_caller() {
    let (err, line) = (ComposableError::with_caller(7, None::<Cause>, 0), line!());

    assert!(matches!(err.caller(), Caller::Resolved(_)), "{:?}", err.caller());
    assert!(err.file().ends_with("caller.rs"), "file: {}", err.file());
    assert_eq!(err.line(), line);
    assert!(
        err.method().ends_with("direct_capture_records_immediate_caller"),
        "method: {}",
        err.method()
    );
    assert!(err.internal_error().to_string().contains("code=7"));
}

#[test]
fn wrapper_skips_its_own_frame() {
    let (err, line) = (TracedError::with_caller(8, Some("boom".into())), line!());

    assert!(err.file().ends_with("caller.rs"), "file: {}", err.file());
    assert_eq!(err.line(), line);
    assert!(
        err.method().ends_with("wrapper_skips_its_own_frame"),
        "method: {}",
        err.method()
    );
}

#[test]
fn method_resolves_even_without_location() {
    let err = ComposableError::with_caller(11, Some("boom"), 0);

    let Caller::Resolved(frame) = err.caller() else {
        panic!("caller not resolved: {:?}", err.caller());
    };
    assert_ne!(err.method(), UNKNOWN_FRAME);
    assert!(
        frame.function.ends_with("method_resolves_even_without_location"),
        "method: {}",
        frame.function
    );
    if frame.file == UNKNOWN_FRAME {
        assert_eq!(frame.line, 0);
    }
}

#[test]
fn plain_construction_leaves_caller_empty() {
    let err = ComposableError::new(9, Some("boom"));
    assert_eq!(err.caller(), &Caller::NotRequested);
    assert_eq!(err.file(), "");
    assert_eq!(err.line(), 0);
    assert_eq!(err.method(), "");
}

#[test]
fn skipping_past_the_stack_degrades_to_placeholder() {
    let err = ComposableError::with_caller(10, Some("boom"), 100_000);
    assert_eq!(err.caller(), &Caller::Unavailable);
    assert_eq!(err.file(), UNKNOWN_FRAME);
    assert_eq!(err.line(), 0);
    assert_eq!(err.method(), UNKNOWN_FRAME);
    assert_eq!(err.internal_error().to_string(), "boom");
}
