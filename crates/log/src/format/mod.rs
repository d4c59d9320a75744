//! Record formatters

mod pattern;
mod simple;

use std::fmt;

pub use pattern::PatternFormatter;
pub use simple::SimpleFormatter;

use crate::core::{LogError, LogResult};
use crate::record::Record;

/// Renders a [`Record`] into a single output line
pub trait Formatter: Send + Sync + fmt::Debug {
    /// Render `record`
    fn format(&self, record: &Record<'_>) -> String;

    /// Property keys this formatter recognises, in configuration order
    fn property_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Apply one property
    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        Err(LogError::invalid_property(name, value, "unknown property"))
    }
}
