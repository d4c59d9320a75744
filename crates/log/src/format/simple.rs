//! Fixed-layout formatter

use crate::core::{LogError, LogResult};
use crate::record::Record;

use super::Formatter;

/// `[LEVEL] logger - message`, followed by the error chain when present
#[derive(Debug, Clone)]
pub struct SimpleFormatter {
    delimiter: String,
}

impl SimpleFormatter {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::format::SimpleFormatter";
    /// Configuration alias
    pub const ALIAS: &'static str = "SimpleFormatter";
    /// Separator placed between logger name, message and error
    pub const DEFAULT_DELIMITER: &'static str = " - ";

    const PROPERTY_NAMES: &'static [&'static str] = &["delimiter"];

    /// Separator in use
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self {
            delimiter: Self::DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl Formatter for SimpleFormatter {
    fn format(&self, record: &Record<'_>) -> String {
        let mut line = String::with_capacity(record.message.len() + record.logger_name.len() + 16);
        line.push('[');
        line.push_str(record.level.as_str());
        line.push_str("] ");
        if !record.logger_name.is_empty() {
            line.push_str(record.logger_name);
            line.push_str(&self.delimiter);
        }
        line.push_str(record.message);
        if let Some(chain) = record.error_chain() {
            line.push_str(&self.delimiter);
            line.push_str(&chain);
        }
        line
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "delimiter" => {
                self.delimiter = value.to_string();
                Ok(())
            }
            _ => Err(LogError::invalid_property(name, value, "unknown property")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use std::io;

    #[test]
    fn formats_named_logger() {
        let record = Record::now("app", "db.pool", Level::Warn, "slow checkout");
        assert_eq!(
            SimpleFormatter::default().format(&record),
            "[WARN] db.pool - slow checkout"
        );
    }

    #[test]
    fn root_logger_has_no_name_part() {
        let record = Record::now("app", "", Level::Info, "ready");
        assert_eq!(SimpleFormatter::default().format(&record), "[INFO] ready");
    }

    #[test]
    fn custom_delimiter_and_error() {
        let mut formatter = SimpleFormatter::default();
        formatter.set_property("delimiter", " | ").unwrap();
        let error = io::Error::other("disk full");
        let record = Record::now("app", "io", Level::Error, "write failed").with_error(Some(&error));
        assert_eq!(
            formatter.format(&record),
            "[ERROR] io | write failed | disk full"
        );
    }
}
