//! Platform log sink backed by `tracing`

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::{LogError, LogResult};
use crate::level::Level;
use crate::record::Record;

use super::Sink;

/// Target of every event emitted by [`TracingSink`]
pub const PLATFORM_TARGET: &str = "arbor_log::platform";

/// Hands each line to the process-wide `tracing` dispatcher
///
/// The event carries the line as its message and the logger name and tag as
/// fields. The tag defaults to the record's client id.
#[derive(Debug, Default)]
pub struct TracingSink {
    tag: Option<String>,
    open: AtomicBool,
}

impl TracingSink {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::sink::TracingSink";
    /// Configuration alias
    pub const ALIAS: &'static str = "TracingSink";

    const PROPERTY_NAMES: &'static [&'static str] = &["tag"];

    /// Sink with a fixed tag
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            open: AtomicBool::new(false),
        }
    }

    /// Configured tag, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

impl Sink for TracingSink {
    fn name(&self) -> &'static str {
        Self::ALIAS
    }

    fn open(&self) -> io::Result<()> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn log(&self, record: &Record<'_>, line: &str) -> io::Result<()> {
        let tag = self.tag.as_deref().unwrap_or(record.client_id);
        let logger = record.logger_name;
        match record.level {
            Level::Fatal | Level::Error => {
                tracing::error!(target: PLATFORM_TARGET, tag, logger, "{line}");
            }
            Level::Warn => tracing::warn!(target: PLATFORM_TARGET, tag, logger, "{line}"),
            Level::Info => tracing::info!(target: PLATFORM_TARGET, tag, logger, "{line}"),
            Level::Debug => tracing::debug!(target: PLATFORM_TARGET, tag, logger, "{line}"),
            Level::Trace => tracing::trace!(target: PLATFORM_TARGET, tag, logger, "{line}"),
            Level::All | Level::Off => {}
        }
        Ok(())
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "tag" => {
                self.tag = Some(value.trim().to_string()).filter(|tag| !tag.is_empty());
                Ok(())
            }
            _ => Err(LogError::invalid_property(name, value, "unknown property")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_property() {
        let mut sink = TracingSink::default();
        assert_eq!(sink.tag(), None);
        sink.set_property("tag", " payments ").unwrap();
        assert_eq!(sink.tag(), Some("payments"));
        sink.set_property("tag", "").unwrap();
        assert_eq!(sink.tag(), None);
    }

    #[test]
    fn clear_is_unsupported() {
        let sink = TracingSink::with_tag("svc");
        assert!(matches!(
            sink.clear(),
            Err(LogError::Unsupported {
                operation: "clear",
                ..
            })
        ));
    }

    #[test]
    fn logging_without_subscriber_is_harmless() {
        let sink = TracingSink::default();
        sink.open().unwrap();
        let record = Record::now("app", "a.b", Level::Fatal, "boom");
        assert!(sink.log(&record, "boom").is_ok());
    }
}
