//! Configuration key names

/// Key names under a configurable prefix (`arbor` by default)
///
/// | Key                                     | Used by      |
/// |-----------------------------------------|--------------|
/// | `arbor.rootLogger`                      | hierarchical |
/// | `arbor.logger.<path>`                   | hierarchical |
/// | `arbor.appender.<name>`                 | hierarchical |
/// | `arbor.appender.<name>.formatter`       | hierarchical |
/// | `arbor.appender.<name>.<prop>`          | both         |
/// | `arbor.appender.<name>.formatter.<prop>`| hierarchical |
/// | `arbor.level`                           | simple       |
/// | `arbor.appender`                        | simple       |
/// | `arbor.formatter`                       | simple       |
/// | `arbor.formatter.<prop>`                | simple       |
/// | `arbor.tag`                             | simple       |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    prefix: String,
    root_logger: String,
    logger_prefix: String,
    appender: String,
    level: String,
    formatter: String,
    tag: String,
}

impl Keys {
    /// Prefix used when none is configured
    pub const DEFAULT_PREFIX: &'static str = "arbor";

    const FORMATTER: &'static str = "formatter";

    /// Key names under `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            root_logger: format!("{prefix}.rootLogger"),
            logger_prefix: format!("{prefix}.logger."),
            appender: format!("{prefix}.appender"),
            level: format!("{prefix}.level"),
            formatter: format!("{prefix}.{}", Self::FORMATTER),
            tag: format!("{prefix}.tag"),
            prefix,
        }
    }

    /// The prefix itself
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Root logger spec; its presence selects the hierarchical dialect
    pub fn root_logger(&self) -> &str {
        &self.root_logger
    }

    /// Prefix of per-logger specs, including the trailing dot
    pub fn logger_prefix(&self) -> &str {
        &self.logger_prefix
    }

    /// Root sink list in the simple dialect
    pub fn appender(&self) -> &str {
        &self.appender
    }

    /// Root level in the simple dialect
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Shared formatter in the simple dialect
    pub fn formatter(&self) -> &str {
        &self.formatter
    }

    /// Client id in the simple dialect
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Property of the shared formatter in the simple dialect
    pub fn formatter_property(&self, property: &str) -> String {
        format!("{}.{property}", self.formatter)
    }

    /// Identifier of the named sink
    pub fn sink(&self, name: &str) -> String {
        format!("{}.{name}", self.appender)
    }

    /// Property of the named sink
    pub fn sink_property(&self, name: &str, property: &str) -> String {
        format!("{}.{name}.{property}", self.appender)
    }

    /// Formatter identifier of the named sink
    pub fn sink_formatter(&self, name: &str) -> String {
        self.sink_property(name, Self::FORMATTER)
    }

    /// Formatter property of the named sink
    pub fn sink_formatter_property(&self, name: &str, property: &str) -> String {
        format!("{}.{name}.{}.{property}", self.appender, Self::FORMATTER)
    }
}

impl Default for Keys {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_grammar() {
        let keys = Keys::default();
        assert_eq!(keys.root_logger(), "arbor.rootLogger");
        assert_eq!(keys.logger_prefix(), "arbor.logger.");
        assert_eq!(keys.appender(), "arbor.appender");
        assert_eq!(keys.level(), "arbor.level");
        assert_eq!(keys.formatter(), "arbor.formatter");
        assert_eq!(keys.formatter_property("pattern"), "arbor.formatter.pattern");
        assert_eq!(keys.sink("out"), "arbor.appender.out");
        assert_eq!(keys.sink_property("out", "file"), "arbor.appender.out.file");
        assert_eq!(keys.sink_formatter("out"), "arbor.appender.out.formatter");
        assert_eq!(
            keys.sink_formatter_property("out", "pattern"),
            "arbor.appender.out.formatter.pattern"
        );
    }

    #[test]
    fn custom_prefix() {
        let keys = Keys::new("svc.log");
        assert_eq!(keys.prefix(), "svc.log");
        assert_eq!(keys.root_logger(), "svc.log.rootLogger");
        assert_eq!(keys.tag(), "svc.log.tag");
    }
}
