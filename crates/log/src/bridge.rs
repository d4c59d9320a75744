//! Routes records from the `log` facade into a [`Repository`]
//!
//! A `log` target such as `my_crate::db::pool` is delivered through the
//! logger `my_crate.db.pool`, so the usual level inheritance applies to
//! crates that only speak `log`.

use std::borrow::Cow;

use crate::core::{LogError, LogResult};
use crate::level::Level;
use crate::repository::Repository;

/// `log::Log` implementation backed by a repository
#[derive(Debug, Clone)]
pub struct LogBridge {
    repository: Repository,
}

impl LogBridge {
    /// Bridge into `repository`
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Target repository
    pub fn repository(&self) -> &Repository {
        &self.repository
    }
}

fn logger_name(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.repository
            .effective_level(&logger_name(metadata.target()))
            .admits(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let logger = self.repository.get_logger(&logger_name(record.target()));
        logger.log(Level::from(record.level()), record.args(), None);
    }

    fn flush(&self) {}
}

/// Install a [`LogBridge`] as the process-wide `log` logger
///
/// Fails if a `log` logger is already installed.
pub fn install_log_bridge(repository: Repository) -> LogResult<()> {
    log::set_boxed_logger(Box::new(LogBridge::new(repository)))
        .map_err(|e| LogError::Config(format!("cannot install log bridge: {e}")))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
