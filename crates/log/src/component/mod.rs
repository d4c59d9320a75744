//! Pluggable component lookup
//!
//! Configuration names sinks and formatters by string. An identifier is first
//! run through the [`AliasTable`], then handed to a [`ComponentFactory`] that
//! maps canonical identifiers to constructors.

mod alias;
mod factory;

pub use alias::AliasTable;
pub use factory::{ComponentFactory, FormatterConstructor, SinkConstructor};
