//! Console sink

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::{LogError, LogResult};
use crate::level::Level;
use crate::record::Record;

use super::Sink;

/// Standard stream the console sink writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    /// Standard output
    #[default]
    Stdout,
    /// Standard error
    Stderr,
}

/// Writes each line to stdout or stderr
#[derive(Debug, Default)]
pub struct ConsoleSink {
    target: ConsoleTarget,
    open: AtomicBool,
}

impl ConsoleSink {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::sink::ConsoleSink";
    /// Configuration alias
    pub const ALIAS: &'static str = "ConsoleSink";

    const PROPERTY_NAMES: &'static [&'static str] = &["target"];

    /// Console sink writing to `target`
    pub fn new(target: ConsoleTarget) -> Self {
        Self {
            target,
            open: AtomicBool::new(false),
        }
    }

    /// The stream lines go to
    pub fn target(&self) -> ConsoleTarget {
        self.target
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &'static str {
        Self::ALIAS
    }

    fn open(&self) -> io::Result<()> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        self.open.store(false, Ordering::Release);
        match self.target {
            ConsoleTarget::Stdout => io::stdout().flush(),
            ConsoleTarget::Stderr => io::stderr().flush(),
        }
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn log(&self, record: &Record<'_>, line: &str) -> io::Result<()> {
        if matches!(record.level, Level::All | Level::Off) {
            return Ok(());
        }
        // The std handles serialise concurrent writers.
        match self.target {
            ConsoleTarget::Stdout => writeln!(io::stdout().lock(), "{line}"),
            ConsoleTarget::Stderr => writeln!(io::stderr().lock(), "{line}"),
        }
    }

    fn clear(&self) -> LogResult<()> {
        Ok(())
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "target" => {
                self.target = match value.trim().to_ascii_lowercase().as_str() {
                    "stdout" => ConsoleTarget::Stdout,
                    "stderr" => ConsoleTarget::Stderr,
                    _ => {
                        return Err(LogError::invalid_property(
                            name,
                            value,
                            "expected 'stdout' or 'stderr'",
                        ));
                    }
                };
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
    fn open_close_toggle_state() {
        let sink = ConsoleSink::default();
        assert!(!sink.is_open());
        sink.open().unwrap();
        assert!(sink.is_open());
        sink.close().unwrap();
        assert!(!sink.is_open());
    }

    #[test]
    fn target_property() {
        let mut sink = ConsoleSink::default();
        sink.set_property("target", "STDERR").unwrap();
        assert_eq!(sink.target(), ConsoleTarget::Stderr);
        assert!(sink.set_property("target", "printer").is_err());
        assert!(sink.set_property("colour", "red").is_err());
    }

    #[test]
    fn console_has_no_size_and_clears_trivially() {
        let sink = ConsoleSink::new(ConsoleTarget::Stderr);
        assert_eq!(sink.log_size(), None);
        assert!(sink.clear().is_ok());
    }
}
