//! Logging macros
//!
//! Each macro takes a logger expression followed by `format!`-style
//! arguments. The message is only rendered when the level is enabled.
//!
//! ```rust
//! use arbor_log::{Level, Repository, info, log, error};
//!
//! let repository = Repository::new();
//! let logger = repository.get_logger("app");
//! let port = 8080;
//!
//! info!(logger, "listening on {port}");
//! log!(logger, Level::Warn, "{} retries left", 3);
//!
//! let failure = std::io::Error::other("refused");
//! error!(logger, err = &failure, "upstream call failed");
//! ```

/// Log at an explicit level, optionally attaching an error with `err = <expr>`
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, err = $err:expr, $($arg:tt)+) => {
        $logger.log(
            $level,
            ::std::format_args!($($arg)+),
            ::std::option::Option::Some($err as &(dyn ::std::error::Error + 'static)),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+), ::std::option::Option::None)
    };
}

/// Log at [`Level::Trace`](crate::Level::Trace)
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

/// Log at [`Level::Debug`](crate::Level::Debug)
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log at [`Level::Info`](crate::Level::Info)
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log at [`Level::Warn`](crate::Level::Warn)
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log at [`Level::Error`](crate::Level::Error)
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log at [`Level::Fatal`](crate::Level::Fatal)
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::format::SimpleFormatter;
    use crate::sink::{MemorySink, Sink, SinkBinding};
    use crate::{Level, Repository};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn macros_format_and_gate() {
        let repository = Repository::new();
        let logger = repository.get_logger("m");
        logger.set_level(Some(Level::Info));
        let sink = MemorySink::new();
        let lines = sink.lines();
        sink.open().unwrap();
        logger.add_sink(SinkBinding::new(
            Arc::new(sink),
            Some(Arc::new(SimpleFormatter::default())),
        ));

        let attempt = 2;
        crate::debug!(logger, "hidden {attempt}");
        crate::info!(logger, "attempt {attempt}");
        crate::log!(logger, Level::Fatal, "{}-{}", "a", 1);
        let failure = io::Error::other("timeout");
        crate::error!(logger, err = &failure, "call failed after {} tries", attempt);

        assert_eq!(
            lines.snapshot(),
            vec![
                "[INFO] m - attempt 2".to_string(),
                "[FATAL] m - a-1".to_string(),
                "[ERROR] m - call failed after 2 tries - timeout".to_string(),
            ]
        );
    }
}
