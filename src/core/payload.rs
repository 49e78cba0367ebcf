//! # Payload
//!
//! Contextual data handed to a menu's `init` on every transition into it.
//! Values are JSON values keyed by name, so the receiving menu never needs
//! to know the sender's type. A payload is moved (or cloned) into `init`,
//! never shared, so no menu can mutate another menu's data after handoff.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    values: BTreeMap<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Decode a value into a concrete type. Returns `None` if the key is
    /// missing or holds a value of a different shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let payload = Payload::default();
        assert!(payload.is_empty());
        assert_eq!(payload.len(), 0);
        assert!(payload.get("anything").is_none());
    }

    #[test]
    fn test_typed_lookup() {
        let payload = Payload::new()
            .with("speed", 0.75)
            .with("label", "intake")
            .with("armed", true);
        assert_eq!(payload.get_as::<f64>("speed"), Some(0.75));
        assert_eq!(payload.get_as::<String>("label").as_deref(), Some("intake"));
        assert_eq!(payload.get_as::<bool>("armed"), Some(true));
        // Wrong shape is None, not a panic
        assert_eq!(payload.get_as::<u32>("label"), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Payload::new().with("count", 1);
        let mut copy = original.clone();
        copy.insert("count", 2);
        assert_eq!(original.get_as::<i32>("count"), Some(1));
        assert_eq!(copy.get_as::<i32>("count"), Some(2));
    }

    #[test]
    fn test_iter_is_key_ordered() {
        let payload = Payload::new().with("b", 2).with("a", 1);
        let keys: Vec<&str> = payload.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
