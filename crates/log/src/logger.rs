//! Named loggers
//!
//! A [`Logger`] lives on exactly one node of its repository's namespace tree.
//! It holds an optional explicit level and the ordered list of sink bindings
//! records are delivered to. Levels are inherited through the tree; bindings
//! are not: a record only reaches the logger's own sinks.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;

use crate::core::{DIAGNOSTIC_TARGET, LogIoResultExt, LogResult, report};
use crate::level::Level;
use crate::record::Record;
use crate::repository::Shared;
use crate::sink::SinkBinding;

const INHERIT: u8 = u8::MAX;

/// Snapshot of a logger's bindings, in delivery order
pub type Bindings = Arc<Vec<Arc<SinkBinding>>>;

/// A named, leveled logger
///
/// Obtain one from [`Repository::get_logger`](crate::Repository::get_logger).
///
/// # Example
///
/// ```rust
/// use arbor_log::{Level, Repository};
///
/// let repository = Repository::new();
/// let logger = repository.get_logger("app.http");
/// logger.set_level(Some(Level::Warn));
///
/// assert!(!logger.is_enabled(Level::Info));
/// assert!(repository.get_logger("app.http.client").is_enabled(Level::Error));
/// ```
pub struct Logger {
    name: String,
    level: AtomicU8,
    bindings: ArcSwap<Vec<Arc<SinkBinding>>>,
    repository: Weak<Shared>,
}

fn encode(level: Option<Level>) -> u8 {
    level.map_or(INHERIT, Level::to_repr)
}

impl Logger {
    pub(crate) fn new(name: String, repository: Weak<Shared>, level: Option<Level>) -> Self {
        Self::wired(name, repository, level, Vec::new())
    }

    /// Logger that starts out with its final level and bindings
    pub(crate) fn wired(
        name: String,
        repository: Weak<Shared>,
        level: Option<Level>,
        bindings: Vec<Arc<SinkBinding>>,
    ) -> Self {
        Self {
            name,
            level: AtomicU8::new(encode(level)),
            bindings: ArcSwap::from_pointee(bindings),
            repository,
        }
    }

    /// Full dotted name, empty for the root logger
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is its repository's root logger
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Explicit level, `None` when inherited
    pub fn level(&self) -> Option<Level> {
        Level::from_repr(self.level.load(Ordering::Acquire))
    }

    /// Set or clear the explicit level
    ///
    /// The root logger always has a level: clearing it restores
    /// [`Level::ROOT_DEFAULT`].
    pub fn set_level(&self, level: Option<Level>) {
        let level = match level {
            None if self.is_root() => Some(Level::ROOT_DEFAULT),
            other => other,
        };
        self.level.store(encode(level), Ordering::Release);
    }

    /// Level this logger currently filters with
    pub fn effective_level(&self) -> Level {
        match self.repository.upgrade() {
            Some(shared) => shared.effective_level(&self.name),
            None => self.level().unwrap_or(Level::Off),
        }
    }

    /// Whether a message at `level` would be delivered
    pub fn is_enabled(&self, level: Level) -> bool {
        self.effective_level().admits(level)
    }

    /// Deliver a message to every bound sink, if `level` is enabled
    ///
    /// The message is only rendered once the level check has passed. Sink
    /// failures are reported on the diagnostic channel and never returned.
    pub fn log(&self, level: Level, message: impl fmt::Display, error: Option<&(dyn Error + 'static)>) {
        let repository = self.repository.upgrade();
        let threshold = match &repository {
            Some(shared) => shared.effective_level(&self.name),
            None => self.level().unwrap_or(Level::Off),
        };
        if !threshold.admits(level) {
            return;
        }

        let bindings = self.bindings.load();
        if bindings.is_empty() {
            return;
        }

        let client_id = repository.as_ref().map(|shared| shared.client_id());
        let message = message.to_string();
        let record = Record::now(
            client_id.as_deref().map_or("", String::as_str),
            &self.name,
            level,
            &message,
        )
        .with_error(error);

        for binding in bindings.iter() {
            binding.deliver(&record);
        }
    }

    /// Log at [`Level::Trace`]
    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::Trace, message, None);
    }

    /// Log at [`Level::Debug`]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::Debug, message, None);
    }

    /// Log at [`Level::Info`]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::Info, message, None);
    }

    /// Log at [`Level::Warn`]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::Warn, message, None);
    }

    /// Log at [`Level::Error`]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::Error, message, None);
    }

    /// Log at [`Level::Fatal`]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.log(Level::Fatal, message, None);
    }

    /// Snapshot of the current bindings
    pub fn bindings(&self) -> Bindings {
        self.bindings.load_full()
    }

    /// Number of bound sinks
    pub fn number_of_sinks(&self) -> usize {
        self.bindings.load().len()
    }

    /// Append a binding. The same sink may be bound more than once.
    pub fn add_sink(&self, binding: SinkBinding) {
        let binding = Arc::new(binding);
        self.with_structure(|| {
            let mut bindings = Vec::clone(&self.bindings.load());
            bindings.push(binding);
            self.replace_bindings(bindings);
        });
    }

    /// Drop every binding and set the explicit level
    pub fn reset_logger(&self, level: Option<Level>) {
        self.with_structure(|| self.reset_locked(level));
    }

    /// Caller holds the structural lock
    pub(crate) fn reset_locked(&self, level: Option<Level>) {
        self.replace_bindings(Vec::new());
        self.set_level(level);
    }

    /// Caller holds the structural lock
    pub(crate) fn replace_bindings(&self, bindings: Vec<Arc<SinkBinding>>) {
        self.bindings.store(Arc::new(bindings));
    }

    /// Close every bound sink
    ///
    /// All sinks are attempted; the first failure is returned and every
    /// failure is reported.
    pub fn close(&self) -> LogResult<()> {
        let mut first = None;
        for binding in self.bindings.load().iter() {
            let sink = binding.sink();
            if let Err(error) = sink.close().with_sink("close", sink.name()) {
                report(&error);
                first.get_or_insert(error);
            }
        }
        tracing::debug!(target: DIAGNOSTIC_TARGET, logger = %self.name, "logger closed");
        first.map_or(Ok(()), Err)
    }

    fn with_structure(&self, mutate: impl FnOnce()) {
        match self.repository.upgrade() {
            Some(shared) => {
                let _guard = shared.lock_structure();
                mutate();
            }
            None => mutate(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.number_of_sinks())
            .finish_non_exhaustive()
    }
}
