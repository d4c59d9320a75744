//! Output sinks
//!
//! A [`Sink`] is a log destination. Sinks are shared between loggers, so
//! every operation except property setup takes `&self`; each implementation
//! serialises its own I/O. Properties are applied on the owned value before
//! the sink is shared.
//!
//! A logger talks to its sinks through [`SinkBinding`]s, which pair a sink
//! with the formatter that renders records for it.

mod console;
mod datagram;
mod file;
mod memory;
mod platform;

use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub use console::{ConsoleSink, ConsoleTarget};
pub use datagram::DatagramSink;
pub use file::FileSink;
pub use memory::{MemoryLines, MemorySink};
pub use platform::TracingSink;

use arc_swap::ArcSwap;

use crate::core::{DIAGNOSTIC_TARGET, LogError, LogIoResultExt, LogResult, LogResultExt};
use crate::format::Formatter;
use crate::record::Record;

/// A log output destination
pub trait Sink: Send + Sync + fmt::Debug {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Acquire the underlying resource. Opening an open sink is a no-op.
    fn open(&self) -> io::Result<()>;

    /// Release the underlying resource
    fn close(&self) -> io::Result<()>;

    /// Whether [`Sink::log`] may be called
    fn is_open(&self) -> bool;

    /// Write one formatted record
    fn log(&self, record: &Record<'_>, line: &str) -> io::Result<()>;

    /// Truncate persisted log data
    fn clear(&self) -> LogResult<()> {
        Err(LogError::Unsupported {
            operation: "clear",
            component: self.name(),
        })
    }

    /// Size of the persisted log in bytes, `None` when undefined
    fn log_size(&self) -> Option<u64> {
        None
    }

    /// Property keys this sink recognises, in configuration order
    fn property_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Apply one property
    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        Err(LogError::invalid_property(name, value, "unknown property"))
    }
}

/// A sink bound to a logger together with its formatter
///
/// Loggers wired to the same configured sink share one binding, so
/// [`SinkBinding::set_formatter`] changes the output of all of them.
pub struct SinkBinding {
    sink: Arc<dyn Sink>,
    formatter: ArcSwap<Option<Arc<dyn Formatter>>>,
    component_id: Option<String>,
    missing_formatter_reported: AtomicBool,
}

impl SinkBinding {
    /// Bind `sink` with an optional formatter
    pub fn new(sink: Arc<dyn Sink>, formatter: Option<Arc<dyn Formatter>>) -> Self {
        Self {
            sink,
            formatter: ArcSwap::from_pointee(formatter),
            component_id: None,
            missing_formatter_reported: AtomicBool::new(false),
        }
    }

    /// Record the canonical identifier the sink was created from
    #[must_use]
    pub fn with_component_id(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }

    /// The bound sink
    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// The current formatter
    pub fn formatter(&self) -> Option<Arc<dyn Formatter>> {
        Option::clone(&self.formatter.load())
    }

    /// Replace the formatter for every logger holding this binding
    pub fn set_formatter(&self, formatter: Option<Arc<dyn Formatter>>) {
        self.formatter.store(Arc::new(formatter));
        self.missing_formatter_reported.store(false, Ordering::Relaxed);
    }

    /// Canonical identifier, when the sink came from the component factory
    pub fn component_id(&self) -> Option<&str> {
        self.component_id.as_deref()
    }

    /// Format and write `record`; failures go to the diagnostic channel
    pub(crate) fn deliver(&self, record: &Record<'_>) {
        let current = self.formatter.load();
        let Some(formatter) = &**current else {
            if !self.missing_formatter_reported.swap(true, Ordering::Relaxed) {
                tracing::warn!(
                    target: DIAGNOSTIC_TARGET,
                    sink = self.sink.name(),
                    logger = record.logger_name,
                    "sink has no formatter, skipping"
                );
            }
            return;
        };
        if !self.sink.is_open() {
            return;
        }
        let line = formatter.format(record);
        self.sink
            .log(record, &line)
            .with_sink("write", self.sink.name())
            .report();
    }
}

impl fmt::Debug for SinkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkBinding")
            .field("sink", &self.sink)
            .field("formatter", &*self.formatter.load())
            .field("component_id", &self.component_id)
            .finish_non_exhaustive()
    }
}

/// Parse a boolean property the way configuration files spell it
pub(crate) fn parse_bool(name: &str, value: &str) -> LogResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(LogError::invalid_property(name, value, "expected a boolean")),
    }
}
