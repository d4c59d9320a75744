//! Flat key/value configuration source

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use serde::{Deserialize, Serialize};

/// Ordered `key = value` pairs
///
/// Keys iterate in lexicographic order, which is also the order the
/// configurator applies logger entries in. Serialises as a plain map, so any
/// serde format with string maps can feed it.
///
/// # Example
///
/// ```rust
/// use arbor_log::Properties;
///
/// let properties: Properties = [
///     ("arbor.level", "INFO"),
///     ("arbor.appender", "ConsoleSink"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(properties.get("arbor.level"), Some("INFO"));
/// assert_eq!(properties.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a key
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every entry in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose key starts with `prefix`, yielded as
    /// `(key without prefix, value)` in key order
    pub fn strip_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.0
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map_while(move |(k, v)| k.strip_prefix(prefix).map(|rest| (rest, v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl From<BTreeMap<String, String>> for Properties {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl From<HashMap<String, String>> for Properties {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_iteration_is_ordered_and_bounded() {
        let properties = Properties::new()
            .with("arbor.logger.b", "INFO")
            .with("arbor.logger.a.x", "WARN")
            .with("arbor.loggers", "ignored")
            .with("arbor.level", "DEBUG")
            .with("zzz", "after");

        let found: Vec<_> = properties.strip_prefix("arbor.logger.").collect();
        assert_eq!(found, vec![("a.x", "WARN"), ("b", "INFO")]);
    }

    #[test]
    fn serde_is_a_plain_map() {
        let properties: Properties =
            serde_json::from_str(r#"{"arbor.level":"WARN","arbor.appender":"MemorySink"}"#)
                .unwrap();
        assert_eq!(properties.get("arbor.level"), Some("WARN"));

        let json = serde_json::to_string(&properties).unwrap();
        assert_eq!(json, r#"{"arbor.appender":"MemorySink","arbor.level":"WARN"}"#);
    }

    #[test]
    fn from_hash_map() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), "v".to_string());
        let mut properties = Properties::from(map);
        properties.extend([("k", "w"), ("j", "x")]);
        assert_eq!(properties.get("k"), Some("w"));
        assert_eq!(properties.remove("j").as_deref(), Some("x"));
        assert!(!properties.contains_key("j"));
    }
}
