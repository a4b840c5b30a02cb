//! Placeholder values for template substitution

use std::collections::HashMap;
use std::fmt::Display;

/// Known placeholder values keyed by token name (`CODE`, `USER_EMAIL`, ...).
///
/// Lookups of names that were never inserted simply return `None`; the
/// substitution engine echoes such tokens back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    values: HashMap<String, String>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PlaceholderMap
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl From<&serde_json::Map<String, serde_json::Value>> for PlaceholderMap {
    fn from(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        let mut map = Self::new();
        for (key, value) in object {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                // For arrays and objects, use JSON representation
                _ => value.to_string(),
            };
            map.values.insert(key.clone(), rendered);
        }
        map
    }
}
