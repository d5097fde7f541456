//! Structured emission of composed errors through `tracing`.
//!
//! Libraries return errors; applications decide where they go. These helpers
//! are for the application side: they record an error as a single event with
//! its code, caller and attributes as fields, and leave formatting to
//! whatever subscriber is installed.
//!
//! ```rust,ignore
//! use errorx::trace::{ResultExt, TraceExt};
//!
//! fn load() -> Result<Config, ConfigError> { ... }
//!
//! let cfg = load().emit_warning(); // still a Result for the caller
//! ```

use tracing::Level;

use crate::structured::StructuredError;

/// Emit a [`StructuredError`] as a `tracing` event.
pub trait TraceExt {
    fn emit_tracing(&self, level: Level, message: &str);
}

macro_rules! emit_at {
    ($level:expr, $err:expr, $message:expr) => {{
        let err = $err;
        tracing::event!(
            $level,
            error = %err,
            code = err.code(),
            file = err.file(),
            line = err.line(),
            method = err.method(),
            attrs = ?err.attrs(),
            nested = err.nested_errors().len(),
            "{}",
            $message
        )
    }};
}

impl<E> TraceExt for E
where
    E: StructuredError + ?Sized,
{
    fn emit_tracing(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => emit_at!(Level::ERROR, self, message),
            Level::WARN => emit_at!(Level::WARN, self, message),
            Level::INFO => emit_at!(Level::INFO, self, message),
            Level::DEBUG => emit_at!(Level::DEBUG, self, message),
            _ => emit_at!(Level::TRACE, self, message),
        }
    }
}

/// Emit the error side of a `Result` and hand the result back unchanged.
pub trait ResultExt<T> {
    fn emit_event(self, level: Level) -> Self;

    fn emit_warning(self) -> Self;

    fn emit_error(self) -> Self;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StructuredError,
{
    fn emit_event(self, level: Level) -> Self {
        if let Err(ref e) = self {
            e.emit_tracing(level, "operation failed");
        }
        self
    }

    fn emit_warning(self) -> Self {
        self.emit_event(Level::WARN)
    }

    fn emit_error(self) -> Self {
        self.emit_event(Level::ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_logs;
    use crate::ComposableError;

    fn failing() -> ComposableError {
        let mut err = ComposableError::new(500, Some("boom"));
        err.with_attr("request_id", "r-1");
        err.push(ComposableError::from_code(501));
        err
    }

    #[test]
    fn event_carries_error_fields() {
        let err = failing();
        let logs = capture_logs(|| err.emit_tracing(Level::WARN, "upstream call failed"));

        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("upstream call failed"), "{logs}");
        assert!(logs.contains("error=error: boom"), "{logs}");
        assert!(logs.contains("code=500"), "{logs}");
        assert!(logs.contains("nested=1"), "{logs}");
        assert!(logs.contains("request_id"), "{logs}");
    }

    #[test]
    fn level_is_respected() {
        let err = failing();
        for (level, name) in [
            (Level::ERROR, "ERROR"),
            (Level::INFO, "INFO"),
            (Level::DEBUG, "DEBUG"),
            (Level::TRACE, "TRACE"),
        ] {
            let logs = capture_logs(|| err.emit_tracing(level, "failed"));
            assert!(logs.contains(name), "{name}: {logs}");
        }
    }

    #[test]
    fn ok_results_emit_nothing() {
        let logs = capture_logs(|| {
            let ok: Result<u8, ComposableError> = Ok(1);
            assert_eq!(ok.emit_event(Level::ERROR).ok(), Some(1));
        });
        assert!(logs.is_empty(), "{logs}");
    }

    #[test]
    fn err_results_emit_and_pass_through() {
        let mut code = 0;
        let logs = capture_logs(|| {
            let err: Result<u8, ComposableError> = Err(ComposableError::from_code(9));
            code = err.emit_warning().unwrap_err().code();
        });
        assert_eq!(code, 9);
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains("operation failed"), "{logs}");
        assert!(logs.contains("code=9"), "{logs}");
    }
}
