//! Error types for arbor-log
//!
//! Configuration problems are non-fatal: the configurator collects them in a
//! [`ConfigReport`](crate::ConfigReport) and carries on with the next entry.
//! Sink I/O failures are reported on the diagnostic channel and never leave a
//! log call. [`LogError::Unsupported`] is the one variant handed straight back
//! to the caller.

use std::io;

/// Type alias for Result with [`LogError`] for logging operations
pub type LogResult<T> = Result<T, LogError>;

/// Which kind of pluggable component an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// An output sink
    Sink,
    /// A record formatter
    Formatter,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sink => f.write_str("sink"),
            Self::Formatter => f.write_str("formatter"),
        }
    }
}

/// Errors produced while configuring or driving loggers
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A level token did not name a known level
    #[error("invalid level '{token}'")]
    InvalidLevel {
        /// The rejected token
        token: String,
    },

    /// No constructor is registered for the identifier
    #[error("unknown {kind} identifier '{id}'")]
    UnknownComponent {
        /// Sink or formatter
        kind: ComponentKind,
        /// Canonical identifier after alias resolution
        id: String,
    },

    /// A constructor was found but failed
    #[error("failed to instantiate {kind} '{id}': {reason}")]
    Instantiation {
        /// Sink or formatter
        kind: ComponentKind,
        /// Canonical identifier
        id: String,
        /// Why construction failed
        reason: String,
    },

    /// A key the wiring depends on is absent from the property source
    #[error("missing property '{key}'")]
    MissingProperty {
        /// The absent key
        key: String,
    },

    /// A component rejected a property value
    #[error("invalid value '{value}' for property '{name}': {reason}")]
    InvalidProperty {
        /// Property name as declared by the component
        name: String,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// Any other configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Sink open/close/write failure
    #[error("{operation} failed on sink '{sink}': {source}")]
    Io {
        /// Which sink operation failed
        operation: &'static str,
        /// Sink name or identifier
        sink: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The operation has no meaning for this component
    #[error("operation '{operation}' is not supported by {component}")]
    Unsupported {
        /// The rejected operation
        operation: &'static str,
        /// The component that rejected it
        component: &'static str,
    },
}

impl LogError {
    /// Shorthand for an [`LogError::InvalidProperty`]
    pub fn invalid_property(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`LogError::Io`]
    pub fn io(operation: &'static str, sink: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation,
            sink: sink.into(),
            source,
        }
    }

    /// Whether this error belongs to the configuration family
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        !matches!(self, Self::Io { .. } | Self::Unsupported { .. })
    }
}
