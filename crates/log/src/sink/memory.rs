//! In-memory sink

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::core::LogResult;
use crate::record::Record;

use super::Sink;

/// Shared view of the lines captured by a [`MemorySink`]
#[derive(Debug, Clone, Default)]
pub struct MemoryLines(Arc<Mutex<Vec<String>>>);

impl MemoryLines {
    /// Copy of every captured line, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Number of captured lines
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    fn push(&self, line: &str) {
        self.0.lock().push(line.to_owned());
    }

    fn clear(&self) {
        self.0.lock().clear();
    }

    fn byte_len(&self) -> u64 {
        self.0.lock().iter().map(|line| line.len() as u64).sum()
    }
}

/// Keeps every line in memory
///
/// Grab a [`MemoryLines`] handle with [`MemorySink::lines`] before handing the
/// sink over; the handle stays valid after the sink is bound to a logger.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: MemoryLines,
    open: AtomicBool,
}

impl MemorySink {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::sink::MemorySink";
    /// Configuration alias
    pub const ALIAS: &'static str = "MemorySink";

    /// Empty, closed sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that appends to an existing buffer
    pub fn with_lines(lines: MemoryLines) -> Self {
        Self {
            lines,
            open: AtomicBool::new(false),
        }
    }

    /// Handle onto the captured lines
    pub fn lines(&self) -> MemoryLines {
        self.lines.clone()
    }
}

impl Sink for MemorySink {
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

    fn log(&self, _record: &Record<'_>, line: &str) -> io::Result<()> {
        self.lines.push(line);
        Ok(())
    }

    fn clear(&self) -> LogResult<()> {
        self.lines.clear();
        Ok(())
    }

    fn log_size(&self) -> Option<u64> {
        Some(self.lines.byte_len())
    }
}
