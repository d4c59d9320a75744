//! Result extension traits and the diagnostic channel

use std::io;

use crate::core::error::{LogError, LogResult};

/// Target used for every diagnostic event the crate emits itself
pub const DIAGNOSTIC_TARGET: &str = "arbor_log";

/// Emit `error` on the diagnostic channel.
///
/// Configuration problems are warnings, sink I/O failures are errors.
pub fn report(error: &LogError) {
    match error {
        LogError::Io { .. } => tracing::error!(target: DIAGNOSTIC_TARGET, %error, "sink I/O failure"),
        LogError::Unsupported { .. } => {
            tracing::warn!(target: DIAGNOSTIC_TARGET, %error, "unsupported operation");
        }
        _ => tracing::warn!(target: DIAGNOSTIC_TARGET, %error, "configuration problem"),
    }
}

/// Extension trait for [`LogResult`]
pub trait LogResultExt<T> {
    /// Report a failure on the diagnostic channel and swallow it
    fn report(self) -> Option<T>;
}

impl<T> LogResultExt<T> for LogResult<T> {
    fn report(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                report(&error);
                None
            }
        }
    }
}

/// Extension trait for IO results produced by sinks
pub trait LogIoResultExt<T> {
    /// Attach the sink operation and sink name to an IO error
    fn with_sink(self, operation: &'static str, sink: &str) -> LogResult<T>;
}

impl<T> LogIoResultExt<T> for io::Result<T> {
    fn with_sink(self, operation: &'static str, sink: &str) -> LogResult<T> {
        self.map_err(|source| LogError::io(operation, sink, source))
    }
}
