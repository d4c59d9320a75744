//! Short names for the built-in components

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::format::{PatternFormatter, SimpleFormatter};
use crate::sink::{ConsoleSink, DatagramSink, FileSink, MemorySink, TracingSink};

static ALIASES: LazyLock<AliasTable> = LazyLock::new(AliasTable::builtin);

/// Maps configuration aliases to canonical component identifiers
///
/// Lookups are case-sensitive. A name with no alias resolves to itself, so a
/// canonical identifier can always be used directly.
#[derive(Debug)]
pub struct AliasTable {
    sinks: HashMap<&'static str, &'static str>,
    formatters: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    fn builtin() -> Self {
        let sinks = [
            (ConsoleSink::ALIAS, ConsoleSink::ID),
            (FileSink::ALIAS, FileSink::ID),
            (TracingSink::ALIAS, TracingSink::ID),
            (DatagramSink::ALIAS, DatagramSink::ID),
            (MemorySink::ALIAS, MemorySink::ID),
        ];
        let formatters = [
            (SimpleFormatter::ALIAS, SimpleFormatter::ID),
            (PatternFormatter::ALIAS, PatternFormatter::ID),
        ];
        Self {
            sinks: sinks.into_iter().collect(),
            formatters: formatters.into_iter().collect(),
        }
    }

    /// The process-wide table, built on first use
    pub fn global() -> &'static Self {
        &ALIASES
    }

    /// Canonical sink identifier for `name`
    pub fn resolve_sink<'a>(&self, name: &'a str) -> &'a str {
        self.sinks.get(name).copied().unwrap_or(name)
    }

    /// Canonical formatter identifier for `name`
    pub fn resolve_formatter<'a>(&self, name: &'a str) -> &'a str {
        self.formatters.get(name).copied().unwrap_or(name)
    }

    /// Every `(alias, identifier)` sink pair
    pub fn sink_aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.sinks.iter().map(|(alias, id)| (*alias, *id))
    }

    /// Every `(alias, identifier)` formatter pair
    pub fn formatter_aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.formatters.iter().map(|(alias, id)| (*alias, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ConsoleSink", "arbor_log::sink::ConsoleSink")]
    #[case("FileSink", "arbor_log::sink::FileSink")]
    #[case("TracingSink", "arbor_log::sink::TracingSink")]
    #[case("DatagramSink", "arbor_log::sink::DatagramSink")]
    #[case("MemorySink", "arbor_log::sink::MemorySink")]
    #[case("arbor_log::sink::FileSink", "arbor_log::sink::FileSink")]
    #[case("consolesink", "consolesink")]
    #[case("my_crate::KafkaSink", "my_crate::KafkaSink")]
    fn sink_aliases(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(AliasTable::global().resolve_sink(name), expected);
    }

    #[test]
    fn formatter_aliases() {
        let table = AliasTable::global();
        assert_eq!(
            table.resolve_formatter("PatternFormatter"),
            "arbor_log::format::PatternFormatter"
        );
        assert_eq!(
            table.resolve_formatter("SimpleFormatter"),
            "arbor_log::format::SimpleFormatter"
        );
        assert_eq!(table.resolve_formatter("ConsoleSink"), "ConsoleSink");
    }

    #[test]
    fn namespaces_are_separate() {
        let table = AliasTable::global();
        assert_eq!(table.resolve_sink("SimpleFormatter"), "SimpleFormatter");
        assert_eq!(table.sink_aliases().count(), 5);
        assert_eq!(table.formatter_aliases().count(), 2);
    }
}
