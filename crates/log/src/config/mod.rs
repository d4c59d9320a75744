//! Property-driven configuration
//!
//! A flat [`Properties`] source is applied to a repository in one of two
//! dialects:
//!
//! - **simple**: one root level, a list of root sinks and one formatter
//!   shared by all of them
//! - **hierarchical**: per-logger `LEVEL, SINK, SINK` specs with named sinks,
//!   each carrying its own formatter and properties
//!
//! The presence of the `<prefix>.rootLogger` key selects the hierarchical
//! dialect. See [`Keys`] for the full key grammar.

mod configurator;
mod keys;
mod properties;

pub use configurator::{ConfigReport, Configurator, Dialect};
pub use keys::Keys;
pub use properties::Properties;
