//! The event handed to formatters and sinks

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::level::Level;

/// A single log event, borrowed for the duration of one delivery
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Identifier of the emitting client (process or application)
    pub client_id: &'a str,
    /// Full dotted name of the logger, empty for the root logger
    pub logger_name: &'a str,
    /// Milliseconds since the Unix epoch
    pub timestamp_millis: u64,
    /// Message level
    pub level: Level,
    /// Already-rendered message text
    pub message: &'a str,
    /// Attached error, if any
    pub error: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current wall-clock time
    pub fn now(client_id: &'a str, logger_name: &'a str, level: Level, message: &'a str) -> Self {
        Self {
            client_id,
            logger_name,
            timestamp_millis: now_millis(),
            level,
            message,
            error: None,
        }
    }

    /// Attach an error
    #[must_use]
    pub fn with_error(mut self, error: Option<&'a (dyn Error + 'static)>) -> Self {
        self.error = error;
        self
    }

    /// Render the attached error and its source chain, one cause per line
    pub fn error_chain(&self) -> Option<String> {
        let error = self.error?;
        let mut rendered = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            rendered.push_str("\ncaused by: ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        Some(rendered)
    }
}

/// Milliseconds since the Unix epoch, zero if the clock is before it
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] io::Error);

    #[test]
    fn error_chain_walks_sources() {
        let error = Outer(io::Error::other("inner"));
        let record = Record::now("app", "a.b", Level::Error, "failed").with_error(Some(&error));
        assert_eq!(
            record.error_chain().as_deref(),
            Some("outer\ncaused by: inner")
        );
    }

    #[test]
    fn no_error_no_chain() {
        let record = Record::now("app", "", Level::Info, "hello");
        assert!(record.error_chain().is_none());
        assert!(record.timestamp_millis > 0);
    }
}
