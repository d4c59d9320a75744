//! # Arbor Log - hierarchical, property-configured logging
//!
//! Named loggers form a dot-delimited namespace. Each logger filters by a
//! level inherited from its nearest configured ancestor and writes to its own
//! sinks through a formatter. A flat key/value [`Properties`] source wires
//! the whole tree.
//!
//! ## Quick Start
//!
//! ```rust
//! use arbor_log::prelude::*;
//!
//! let repository = Repository::new();
//! let report = repository.configure(
//!     &Properties::new()
//!         .with("arbor.rootLogger", "INFO, console")
//!         .with("arbor.logger.app.db", "DEBUG")
//!         .with("arbor.appender.console", "ConsoleSink")
//!         .with("arbor.appender.console.formatter", "PatternFormatter")
//!         .with("arbor.appender.console.formatter.pattern", "%d{ABSOLUTE} %-5P %c - %m"),
//! );
//! assert!(report.is_clean());
//!
//! let logger = repository.get_logger("app.db.pool");
//! debug!(logger, "checked out connection {}", 7);
//! repository.shutdown()?;
//! # Ok::<(), LogError>(())
//! ```
//!
//! ## Diagnostics
//!
//! Problems inside the logging system itself are emitted as `tracing` events
//! under the [`DIAGNOSTIC_TARGET`] target. Install any `tracing` subscriber to
//! see them.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod component;
pub mod config;
pub mod core;
pub mod format;
pub mod sink;

mod level;
mod logger;
mod macros;
mod record;
mod repository;

#[cfg(feature = "log-compat")]
mod bridge;

use std::sync::{Arc, OnceLock};

// Public API
pub use crate::component::{AliasTable, ComponentFactory};
pub use crate::config::{ConfigReport, Configurator, Dialect, Keys, Properties};
pub use crate::core::{ComponentKind, DIAGNOSTIC_TARGET, LogError, LogResult, LogResultExt};
pub use crate::format::Formatter;
pub use crate::level::Level;
pub use crate::logger::{Bindings, Logger};
pub use crate::record::Record;
pub use crate::repository::{DEFAULT_CLIENT_ID, Repository, RepositoryBuilder};
pub use crate::sink::{Sink, SinkBinding};

#[cfg(feature = "log-compat")]
pub use crate::bridge::{LogBridge, install_log_bridge};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        ConfigReport, Level, LogError, LogResult, Logger, Properties, Repository, debug, error,
        fatal, info, log, trace, warn,
    };
}

static GLOBAL: OnceLock<Repository> = OnceLock::new();

/// The process-wide repository, created with defaults on first use
pub fn global() -> &'static Repository {
    GLOBAL.get_or_init(Repository::new)
}

/// Install `repository` as the process-wide repository
///
/// Must run before anything touches [`global`]; afterwards the global
/// instance is fixed for the life of the process.
pub fn init_global(repository: Repository) -> LogResult<&'static Repository> {
    GLOBAL
        .set(repository)
        .map_err(|_| LogError::Config("global repository is already initialised".into()))?;
    Ok(global())
}

/// Configure the process-wide repository
pub fn configure(properties: &Properties) -> ConfigReport {
    global().configure(properties)
}

/// Logger from the process-wide repository
pub fn get_logger(name: &str) -> Arc<Logger> {
    global().get_logger(name)
}

/// Root logger of the process-wide repository
pub fn root_logger() -> Arc<Logger> {
    global().root_logger()
}

/// Close every sink of the process-wide repository
pub fn shutdown() -> LogResult<()> {
    global().shutdown()
}
