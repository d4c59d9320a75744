//! Applies a [`Properties`] source to a [`Repository`]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::AliasTable;
use crate::core::{DIAGNOSTIC_TARGET, LogError, LogIoResultExt, LogResult, report};
use crate::format::{Formatter, PatternFormatter};
use crate::level::Level;
use crate::repository::{LoggerPlan, Repository, TreePlan, normalize};
use crate::sink::{ConsoleSink, Sink, SinkBinding};

use super::Properties;

/// Which key grammar a configuration pass used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Root level, root sink list and one shared formatter
    Simple,
    /// Per-logger specs with named, individually formatted sinks
    Hierarchical,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Hierarchical => f.write_str("hierarchical"),
        }
    }
}

/// Outcome of a configuration pass
///
/// Every problem met during the pass is listed in the order it was found.
/// None of them stopped the pass.
#[derive(Debug)]
#[must_use]
pub struct ConfigReport {
    dialect: Dialect,
    errors: Vec<LogError>,
}

impl ConfigReport {
    /// Dialect the source was read in
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Problems found, in order
    pub fn errors(&self) -> &[LogError] {
        &self.errors
    }

    /// Whether the pass met no problem at all
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the problems out of the report
    pub fn into_errors(self) -> Vec<LogError> {
        self.errors
    }
}

type SinkCache = HashMap<String, Option<Arc<SinkBinding>>>;

/// Wires sinks and formatters onto a repository's loggers
///
/// Usually reached through [`Repository::configure`].
///
/// # Example
///
/// ```rust
/// use arbor_log::{Configurator, Dialect, Level, Properties, Repository};
///
/// let repository = Repository::new();
/// let properties = Properties::new()
///     .with("arbor.rootLogger", "WARN, mem")
///     .with("arbor.logger.app.db", "TRACE")
///     .with("arbor.appender.mem", "MemorySink")
///     .with("arbor.appender.mem.formatter", "SimpleFormatter");
///
/// let report = Configurator::new(&repository).configure(&properties);
/// assert_eq!(report.dialect(), Dialect::Hierarchical);
/// assert!(report.is_clean());
/// assert_eq!(repository.effective_level("app.db.pool"), Level::Trace);
/// assert_eq!(repository.root_logger().number_of_sinks(), 1);
/// ```
#[derive(Debug)]
pub struct Configurator<'a> {
    repository: &'a Repository,
    errors: Vec<LogError>,
}

impl<'a> Configurator<'a> {
    /// Configurator for `repository`
    pub fn new(repository: &'a Repository) -> Self {
        Self {
            repository,
            errors: Vec::new(),
        }
    }

    /// Run one configuration pass
    pub fn configure(mut self, properties: &Properties) -> ConfigReport {
        let dialect = if properties.contains_key(self.repository.keys().root_logger()) {
            Dialect::Hierarchical
        } else {
            Dialect::Simple
        };
        tracing::info!(
            target: DIAGNOSTIC_TARGET,
            %dialect,
            entries = properties.len(),
            "applying logging configuration"
        );

        match dialect {
            Dialect::Simple => self.simple(properties),
            Dialect::Hierarchical => self.hierarchical(properties),
        }

        if !self.errors.is_empty() {
            tracing::warn!(
                target: DIAGNOSTIC_TARGET,
                problems = self.errors.len(),
                "logging configuration applied with problems"
            );
        }
        ConfigReport {
            dialect,
            errors: self.errors,
        }
    }

    fn fail(&mut self, error: LogError) {
        report(&error);
        self.errors.push(error);
    }

    fn attempt<T>(&mut self, result: LogResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    fn simple(&mut self, properties: &Properties) {
        let repository = self.repository;
        let keys = repository.keys();

        if let Some(tag) = properties.get(keys.tag()).map(str::trim) {
            if tag.is_empty() {
                self.fail(LogError::invalid_property(keys.tag(), tag, "empty client id"));
            } else {
                repository.set_client_id(tag);
            }
        }

        let level = properties
            .get(keys.level())
            .and_then(|token| self.attempt(token.parse::<Level>()));

        let list = properties.get(keys.appender()).unwrap_or(ConsoleSink::ALIAS);
        let mut added = Vec::new();
        for name in list.split([';', ',']).map(str::trim).filter(|n| !n.is_empty()) {
            let id = AliasTable::global().resolve_sink(name);
            let Some(mut sink) = self.attempt(repository.factory().create_sink(id)) else {
                continue;
            };
            self.apply_properties(
                sink.property_names(),
                |property| keys.sink_property(name, property),
                properties,
                |property, value| sink.set_property(property, value),
            );
            let sink: Arc<dyn Sink> = Arc::from(sink);
            self.open(&sink);
            tracing::debug!(target: DIAGNOSTIC_TARGET, sink = id, "root sink added");
            added.push(Arc::new(SinkBinding::new(sink, None).with_component_id(id)));
        }

        let formatter_name = properties
            .get(keys.formatter())
            .map_or(PatternFormatter::ALIAS, str::trim);
        let formatter = self.formatter(
            formatter_name,
            |property| keys.formatter_property(property),
            properties,
        );

        repository.with_root_locked(|root| {
            if let Some(level) = level {
                root.set_level(Some(level));
            }
            let bindings: Vec<_> = root.bindings().iter().cloned().chain(added).collect();
            if formatter.is_some() {
                for binding in &bindings {
                    binding.set_formatter(formatter.clone());
                }
            }
            root.replace_bindings(bindings);
        });
    }

    fn hierarchical(&mut self, properties: &Properties) {
        let repository = self.repository;
        let keys = repository.keys();
        let mut cache = SinkCache::new();
        let mut plan = TreePlan::default();

        let root_spec = properties.get(keys.root_logger()).unwrap_or_default();
        plan.root = self.logger_plan(root_spec, properties, &mut cache);

        for (path, spec) in properties.strip_prefix(keys.logger_prefix()) {
            let name = normalize(path);
            let logger = self.logger_plan(spec, properties, &mut cache);
            let entry = if name.is_empty() {
                &mut plan.root
            } else {
                plan.loggers.entry(name.into_owned()).or_default()
            };
            if logger.level.is_some() {
                entry.level = logger.level;
            }
            entry.bindings.extend(logger.bindings);
        }

        tracing::debug!(
            target: DIAGNOSTIC_TARGET,
            loggers = plan.loggers.len(),
            sinks = cache.values().flatten().count(),
            "installing logger tree"
        );
        repository.install(plan);
    }

    /// Parse `LEVEL[, SINK]*`
    fn logger_plan(
        &mut self,
        spec: &str,
        properties: &Properties,
        cache: &mut SinkCache,
    ) -> LoggerPlan {
        let (token, sinks) = spec.split_once(',').unwrap_or((spec, ""));
        let token = token.trim();
        let level = if token.is_empty() {
            None
        } else {
            self.attempt(token.parse::<Level>())
        };

        let mut bindings = Vec::new();
        for name in sinks.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let binding = match cache.get(name) {
                Some(cached) => cached.clone(),
                None => {
                    let created = self.named_sink(name, properties);
                    cache.insert(name.to_owned(), created.clone());
                    created
                }
            };
            bindings.extend(binding);
        }
        LoggerPlan { level, bindings }
    }

    fn named_sink(&mut self, name: &str, properties: &Properties) -> Option<Arc<SinkBinding>> {
        let repository = self.repository;
        let keys = repository.keys();

        let sink_key = keys.sink(name);
        let Some(declared) = properties.get(&sink_key) else {
            self.fail(LogError::MissingProperty { key: sink_key });
            return None;
        };
        let id = AliasTable::global().resolve_sink(declared.trim());
        let mut sink = self.attempt(repository.factory().create_sink(id))?;

        let formatter_key = keys.sink_formatter(name);
        let formatter = match properties.get(&formatter_key) {
            Some(formatter) => self.formatter(
                formatter.trim(),
                |property| keys.sink_formatter_property(name, property),
                properties,
            ),
            None => {
                self.fail(LogError::MissingProperty { key: formatter_key });
                None
            }
        };

        self.apply_properties(
            sink.property_names(),
            |property| keys.sink_property(name, property),
            properties,
            |property, value| sink.set_property(property, value),
        );
        let sink: Arc<dyn Sink> = Arc::from(sink);
        self.open(&sink);

        tracing::debug!(target: DIAGNOSTIC_TARGET, sink = name, id, "sink created");
        Some(Arc::new(SinkBinding::new(sink, formatter).with_component_id(id)))
    }

    fn formatter(
        &mut self,
        name: &str,
        key: impl Fn(&str) -> String,
        properties: &Properties,
    ) -> Option<Arc<dyn Formatter>> {
        let id = AliasTable::global().resolve_formatter(name);
        let mut formatter = self.attempt(self.repository.factory().create_formatter(id))?;
        self.apply_properties(formatter.property_names(), key, properties, |property, value| {
            formatter.set_property(property, value)
        });
        Some(Arc::from(formatter))
    }

    fn apply_properties(
        &mut self,
        names: &[&str],
        key: impl Fn(&str) -> String,
        properties: &Properties,
        mut set: impl FnMut(&str, &str) -> LogResult<()>,
    ) {
        for &property in names {
            if let Some(value) = properties.get(&key(property)) {
                tracing::debug!(target: DIAGNOSTIC_TARGET, property, value, "setting property");
                self.attempt(set(property, value));
            }
        }
    }

    fn open(&mut self, sink: &Arc<dyn Sink>) {
        self.attempt(sink.open().with_sink("open", sink.name()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentFactory;
    use crate::core::ComponentKind;
    use crate::sink::{MemoryLines, MemorySink};
    use pretty_assertions::assert_eq;

    /// Factory whose `MemorySink`s all append to one buffer
    fn capturing() -> (Repository, MemoryLines) {
        let lines = MemoryLines::default();
        let shared = lines.clone();
        let mut factory = ComponentFactory::with_builtins();
        factory.register_sink(MemorySink::ID, move || {
            Ok(Box::new(MemorySink::with_lines(shared.clone())))
        });
        (Repository::builder().factory(factory).build(), lines)
    }

    #[test]
    fn simple_dialect_defaults() {
        let repository = Repository::new();
        let report = repository.configure(&Properties::new());
        assert_eq!(report.dialect(), Dialect::Simple);
        assert!(report.is_clean(), "{:?}", report.errors());

        let root = repository.root_logger();
        assert_eq!(root.level(), Some(Level::ROOT_DEFAULT));
        let bindings = root.bindings();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].component_id(), Some(ConsoleSink::ID));
        assert!(bindings[0].formatter().is_some());
    }

    #[test]
    fn simple_dialect_is_additive_and_rebinds_formatter() {
        let (repository, lines) = capturing();
        let first = Properties::new()
            .with("arbor.appender", "MemorySink")
            .with("arbor.formatter", "PatternFormatter")
            .with("arbor.formatter.pattern", "first %m");
        assert!(repository.configure(&first).is_clean());

        let second = Properties::new()
            .with("arbor.level", "INFO")
            .with("arbor.appender", " MemorySink ; ")
            .with("arbor.formatter", "SimpleFormatter");
        assert!(repository.configure(&second).is_clean());

        let root = repository.root_logger();
        assert_eq!(root.number_of_sinks(), 2);
        root.debug("hidden");
        root.info("both");
        assert_eq!(
            lines.snapshot(),
            vec!["[INFO] both".to_string(), "[INFO] both".to_string()]
        );
    }

    #[test]
    fn simple_dialect_formatter_reaches_shared_sinks() {
        let (repository, lines) = capturing();
        let tree = Properties::new()
            .with("arbor.rootLogger", "INFO, mem")
            .with("arbor.logger.a", "INFO, mem")
            .with("arbor.appender.mem", "MemorySink")
            .with("arbor.appender.mem.formatter", "SimpleFormatter");
        assert!(repository.configure(&tree).is_clean());

        let restyle = Properties::new()
            .with("arbor.appender", "")
            .with("arbor.formatter", "PatternFormatter")
            .with("arbor.formatter.pattern", "P:%m");
        assert!(repository.configure(&restyle).is_clean());

        repository.root_logger().info("root");
        repository.get_logger("a").info("child");
        assert_eq!(
            lines.snapshot(),
            vec!["P:root".to_string(), "P:child".to_string()]
        );
    }

    #[test]
    fn simple_dialect_bad_level_keeps_previous() {
        let repository = Repository::new();
        repository.root_logger().set_level(Some(Level::Error));
        let properties = Properties::new()
            .with("arbor.level", "LOUD")
            .with("arbor.appender", "MemorySink");
        let report = repository.configure(&properties);

        assert!(matches!(report.errors(), [LogError::InvalidLevel { token }] if token == "LOUD"));
        assert_eq!(repository.root_logger().level(), Some(Level::Error));
    }

    #[test]
    fn simple_dialect_unknown_sink_is_skipped() {
        let repository = Repository::new();
        let properties = Properties::new().with("arbor.appender", "NoSuchSink, MemorySink");
        let report = repository.configure(&properties);

        assert!(matches!(
            report.errors(),
            [LogError::UnknownComponent { kind: ComponentKind::Sink, id }] if id == "NoSuchSink"
        ));
        assert_eq!(repository.root_logger().number_of_sinks(), 1);
    }

    #[test]
    fn simple_dialect_tag_sets_client_id() {
        let repository = Repository::new();
        let properties = Properties::new()
            .with("arbor.tag", " payments ")
            .with("arbor.appender", "MemorySink");
        assert!(repository.configure(&properties).is_clean());
        assert_eq!(repository.client_id().as_str(), "payments");
    }

    #[test]
    fn hierarchical_dialect_shares_named_sinks() {
        let repository = Repository::new();
        let properties = Properties::new()
            .with("arbor.rootLogger", "INFO, out")
            .with("arbor.logger.a.b", "ERROR, out, , out")
            .with("arbor.logger.c", ", out")
            .with("arbor.appender.out", "MemorySink")
            .with("arbor.appender.out.formatter", "SimpleFormatter");
        let report = repository.configure(&properties);
        assert_eq!(report.dialect(), Dialect::Hierarchical);
        assert!(report.is_clean(), "{:?}", report.errors());

        let root = repository.root_logger();
        let ab = repository.get_logger("a.b");
        let c = repository.get_logger("c");
        assert_eq!(ab.level(), Some(Level::Error));
        assert_eq!(c.level(), None);
        assert_eq!(ab.number_of_sinks(), 2);

        let root_sink = Arc::clone(root.bindings()[0].sink());
        assert!(Arc::ptr_eq(ab.bindings()[1].sink(), &root_sink));
        assert!(Arc::ptr_eq(c.bindings()[0].sink(), &root_sink));
        assert!(root_sink.is_open());
    }

    #[test]
    fn hierarchical_dialect_missing_formatter() {
        let (repository, lines) = capturing();
        let properties = Properties::new()
            .with("arbor.rootLogger", "DEBUG, bare")
            .with("arbor.appender.bare", "MemorySink");
        let report = repository.configure(&properties);

        assert!(matches!(
            report.errors(),
            [LogError::MissingProperty { key }] if key == "arbor.appender.bare.formatter"
        ));
        let root = repository.root_logger();
        assert_eq!(root.number_of_sinks(), 1);
        assert!(root.bindings()[0].formatter().is_none());
        root.info("dropped");
        assert!(lines.is_empty());
    }

    #[test]
    fn hierarchical_dialect_undeclared_sink_reported_once() {
        let repository = Repository::new();
        let properties = Properties::new()
            .with("arbor.rootLogger", "WARN, ghost")
            .with("arbor.logger.x", "INFO, ghost");
        let report = repository.configure(&properties);

        assert_eq!(report.errors().len(), 1);
        assert!(matches!(
            &report.errors()[0],
            LogError::MissingProperty { key } if key == "arbor.appender.ghost"
        ));
        assert_eq!(repository.get_logger("x").number_of_sinks(), 0);
    }

    #[test]
    fn hierarchical_dialect_invalid_level_keeps_root() {
        let repository = Repository::new();
        repository.root_logger().set_level(Some(Level::Fatal));
        let properties = Properties::new()
            .with("arbor.rootLogger", "NOISY")
            .with("arbor.logger.a", "nope");
        let report = repository.configure(&properties);

        assert_eq!(report.errors().len(), 2);
        assert_eq!(repository.root_logger().level(), Some(Level::Fatal));
        assert!(repository.contains("a"));
        assert_eq!(repository.get_logger("a").level(), None);
    }

    #[test]
    fn hierarchical_dialect_applies_properties() {
        let repository = Repository::new();
        let properties = Properties::new()
            .with("arbor.rootLogger", "INFO, net")
            .with("arbor.appender.net", "DatagramSink")
            .with("arbor.appender.net.port", "not-a-port")
            .with("arbor.appender.net.formatter", "PatternFormatter")
            .with("arbor.appender.net.formatter.pattern", "%P %m");
        let report = repository.configure(&properties);

        assert!(matches!(
            report.errors(),
            [LogError::InvalidProperty { name, .. }] if name == "port"
        ));
        let root = repository.root_logger();
        let bindings = root.bindings();
        assert_eq!(bindings[0].component_id(), Some("arbor_log::sink::DatagramSink"));
        repository.shutdown().unwrap();
    }

    #[test]
    fn hierarchical_dialect_clears_unlisted_loggers() {
        let (repository, lines) = capturing();
        let first = Properties::new()
            .with("arbor.rootLogger", "INFO")
            .with("arbor.logger.old.logger", "TRACE, mem")
            .with("arbor.appender.mem", "MemorySink")
            .with("arbor.appender.mem.formatter", "SimpleFormatter");
        assert!(repository.configure(&first).is_clean());
        let old = repository.get_logger("old.logger");

        let second = Properties::new()
            .with("arbor.rootLogger", "INFO")
            .with("arbor.logger.new", "DEBUG");
        assert!(repository.configure(&second).is_clean());

        assert!(repository.contains("new"));
        assert!(Arc::ptr_eq(&old, &repository.get_logger("old.logger")));
        assert_eq!(old.level(), None);
        assert_eq!(old.number_of_sinks(), 0);
        old.info("unwired");
        assert!(lines.is_empty());
    }

    #[test]
    fn hierarchical_dialect_keeps_held_handles_wired() {
        let (repository, lines) = capturing();
        let held = repository.get_logger("app");
        let properties = Properties::new()
            .with("arbor.rootLogger", "INFO")
            .with("arbor.logger.app", "INFO, mem")
            .with("arbor.appender.mem", "MemorySink")
            .with("arbor.appender.mem.formatter", "SimpleFormatter");
        assert!(repository.configure(&properties).is_clean());

        assert!(Arc::ptr_eq(&held, &repository.get_logger("app")));
        assert_eq!(held.number_of_sinks(), 1);
        held.info("from held handle");
        assert_eq!(lines.snapshot(), vec!["[INFO] app - from held handle".to_string()]);

        repository.shutdown().unwrap();
        assert!(!held.bindings()[0].sink().is_open());
    }

    #[test]
    fn hierarchical_dialect_empty_logger_path_is_root() {
        let (repository, lines) = capturing();
        let properties = Properties::new()
            .with("arbor.rootLogger", "")
            .with("arbor.logger.", "ERROR, mem")
            .with("arbor.appender.mem", "MemorySink")
            .with("arbor.appender.mem.formatter", "SimpleFormatter");
        let report = repository.configure(&properties);
        assert!(report.is_clean(), "{:?}", report.errors());

        let root = repository.root_logger();
        assert_eq!(root.level(), Some(Level::Error));
        root.warn("hidden");
        root.error("shown");
        assert_eq!(lines.snapshot(), vec!["[ERROR] shown".to_string()]);
        assert_eq!(repository.number_of_leaf_nodes(), 0);
    }
}
