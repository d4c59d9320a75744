//! Identifier-to-constructor table

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::{ComponentKind, LogError, LogResult};
use crate::format::{Formatter, PatternFormatter, SimpleFormatter};
use crate::sink::{ConsoleSink, DatagramSink, FileSink, MemorySink, Sink, TracingSink};

/// Builds a fresh, unopened sink
pub type SinkConstructor = Arc<dyn Fn() -> LogResult<Box<dyn Sink>> + Send + Sync>;

/// Builds a fresh formatter
pub type FormatterConstructor = Arc<dyn Fn() -> LogResult<Box<dyn Formatter>> + Send + Sync>;

/// Creates sinks and formatters from canonical identifiers
///
/// Components come back boxed so the configurator can apply properties
/// before they are shared.
///
/// # Example
///
/// ```rust
/// use arbor_log::ComponentFactory;
/// use arbor_log::sink::MemorySink;
///
/// let mut factory = ComponentFactory::with_builtins();
/// factory.register_sink("app::AuditSink", || Ok(Box::new(MemorySink::new())));
///
/// assert!(factory.has_sink("app::AuditSink"));
/// assert!(factory.create_sink("app::Missing").is_err());
/// ```
#[derive(Clone, Default)]
pub struct ComponentFactory {
    sinks: HashMap<String, SinkConstructor>,
    formatters: HashMap<String, FormatterConstructor>,
}

impl ComponentFactory {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding every built-in sink and formatter
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory
            .register_sink(ConsoleSink::ID, || Ok(Box::new(ConsoleSink::default())))
            .register_sink(FileSink::ID, || Ok(Box::new(FileSink::default())))
            .register_sink(TracingSink::ID, || Ok(Box::new(TracingSink::default())))
            .register_sink(DatagramSink::ID, || Ok(Box::new(DatagramSink::default())))
            .register_sink(MemorySink::ID, || Ok(Box::new(MemorySink::new())))
            .register_formatter(SimpleFormatter::ID, || {
                Ok(Box::new(SimpleFormatter::default()))
            })
            .register_formatter(PatternFormatter::ID, || {
                Ok(Box::new(PatternFormatter::default()))
            });
        factory
    }

    /// Register a sink constructor. Replaces any previous one for `id`.
    pub fn register_sink<F>(&mut self, id: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> LogResult<Box<dyn Sink>> + Send + Sync + 'static,
    {
        self.sinks.insert(id.into(), Arc::new(constructor));
        self
    }

    /// Register a formatter constructor. Replaces any previous one for `id`.
    pub fn register_formatter<F>(&mut self, id: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn() -> LogResult<Box<dyn Formatter>> + Send + Sync + 'static,
    {
        self.formatters.insert(id.into(), Arc::new(constructor));
        self
    }

    /// Whether a sink constructor is registered for `id`
    pub fn has_sink(&self, id: &str) -> bool {
        self.sinks.contains_key(id)
    }

    /// Whether a formatter constructor is registered for `id`
    pub fn has_formatter(&self, id: &str) -> bool {
        self.formatters.contains_key(id)
    }

    /// Instantiate the sink registered for `id`
    pub fn create_sink(&self, id: &str) -> LogResult<Box<dyn Sink>> {
        let constructor = self
            .sinks
            .get(id)
            .ok_or_else(|| unknown(ComponentKind::Sink, id))?;
        constructor().map_err(|e| instantiation(ComponentKind::Sink, id, e))
    }

    /// Instantiate the formatter registered for `id`
    pub fn create_formatter(&self, id: &str) -> LogResult<Box<dyn Formatter>> {
        let constructor = self
            .formatters
            .get(id)
            .ok_or_else(|| unknown(ComponentKind::Formatter, id))?;
        constructor().map_err(|e| instantiation(ComponentKind::Formatter, id, e))
    }
}

fn unknown(kind: ComponentKind, id: &str) -> LogError {
    LogError::UnknownComponent {
        kind,
        id: id.to_string(),
    }
}

fn instantiation(kind: ComponentKind, id: &str, error: LogError) -> LogError {
    match error {
        already @ LogError::Instantiation { .. } => already,
        other => LogError::Instantiation {
            kind,
            id: id.to_string(),
            reason: other.to_string(),
        },
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sinks: Vec<_> = self.sinks.keys().collect();
        let mut formatters: Vec<_> = self.formatters.keys().collect();
        sinks.sort();
        formatters.sort();
        f.debug_struct("ComponentFactory")
            .field("sinks", &sinks)
            .field("formatters", &formatters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::AliasTable;

    #[test]
    fn every_alias_has_a_builtin_constructor() {
        let factory = ComponentFactory::with_builtins();
        let aliases = AliasTable::global();
        for (alias, id) in aliases.sink_aliases() {
            let sink = factory.create_sink(id).unwrap();
            assert_eq!(sink.name(), alias);
        }
        for (_, id) in aliases.formatter_aliases() {
            assert!(factory.create_formatter(id).is_ok(), "{id}");
        }
    }

    #[test]
    fn unknown_identifier() {
        let factory = ComponentFactory::with_builtins();
        let error = factory.create_sink("com.example.NoSuchSink").unwrap_err();
        assert!(matches!(
            error,
            LogError::UnknownComponent {
                kind: ComponentKind::Sink,
                ref id,
            } if id == "com.example.NoSuchSink"
        ));
        assert!(matches!(
            factory.create_formatter("ConsoleSink"),
            Err(LogError::UnknownComponent {
                kind: ComponentKind::Formatter,
                ..
            })
        ));
    }

    #[test]
    fn failing_constructor_becomes_instantiation_error() {
        let mut factory = ComponentFactory::new();
        factory.register_sink("flaky", || Err(LogError::Config("no device".into())));
        let error = factory.create_sink("flaky").unwrap_err();
        assert!(matches!(
            error,
            LogError::Instantiation {
                kind: ComponentKind::Sink,
                ..
            }
        ));
        assert!(error.to_string().contains("no device"));
    }

    #[test]
    fn registration_replaces() {
        let mut factory = ComponentFactory::new();
        assert!(!factory.has_formatter("f"));
        factory
            .register_formatter("f", || Ok(Box::new(SimpleFormatter::default())))
            .register_formatter("f", || Ok(Box::new(PatternFormatter::new("%m"))));
        assert!(factory.has_formatter("f"));
        assert!(format!("{factory:?}").contains("\"f\""));
    }
}
