//! Ordered property storage for records.
//!
//! [`PropertyMap`] wraps an [`IndexMap`] keyed by property name text, so
//! iteration follows first insertion. Re-assigning an existing name replaces
//! its value (and the name's attributes) in place without moving the entry.
//!
//! ## Examples
//!
//! ```rust
//! use binval::{PropertyMap, PropertyName, Value};
//!
//! let mut map = PropertyMap::new();
//! map.insert("name".into(), Value::from("Alice"));
//! map.insert("age".into(), Value::from(30));
//! map.insert("name".into(), Value::from("Bob"));
//!
//! let keys: Vec<&str> = map.names().map(PropertyName::as_str).collect();
//! assert_eq!(keys, vec!["name", "age"]);
//! ```

use crate::{AttributeSet, Value};
use indexmap::IndexMap;
use std::fmt;

/// A record key: property text plus its own attributes.
///
/// Two names address the same property when their text matches; the
/// attributes travel with the entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyName {
    name: String,
    attributes: AttributeSet,
}

impl PropertyName {
    pub fn new(name: impl Into<String>) -> Self {
        PropertyName {
            name: name.into(),
            attributes: AttributeSet::new(),
        }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for PropertyName {
    fn from(name: &str) -> Self {
        PropertyName::new(name)
    }
}

impl From<String> for PropertyName {
    fn from(name: String) -> Self {
        PropertyName::new(name)
    }
}

/// An insertion-ordered map from property names to values.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap(IndexMap<String, (PropertyName, Value)>);

impl PropertyMap {
    #[must_use]
    pub fn new() -> Self {
        PropertyMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        PropertyMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts or replaces a property, returning the previous value.
    ///
    /// A replaced property keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::{PropertyMap, Value};
    ///
    /// let mut map = PropertyMap::new();
    /// assert!(map.insert("key".into(), Value::from(42)).is_none());
    /// assert!(map.insert("key".into(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, name: PropertyName, value: Value) -> Option<Value> {
        let key = name.name.clone();
        self.0.insert(key, (name, value)).map(|(_, old)| old)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).map(|(_, value)| value)
    }

    #[must_use]
    pub fn get_name(&self, name: &str) -> Option<&PropertyName> {
        self.0.get(name).map(|(name, _)| name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Removes a property, preserving the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name).map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &PropertyName> {
        self.0.values().map(|(name, _)| name)
    }

    /// Returns the properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &Value)> {
        self.0.values().map(|(name, value)| (name, value))
    }
}

impl FromIterator<(PropertyName, Value)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (PropertyName, Value)>>(iter: T) -> Self {
        let mut map = PropertyMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl IntoIterator for PropertyMap {
    type Item = (PropertyName, Value);
    type IntoIter = indexmap::map::IntoValues<String, (PropertyName, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reassignment_keeps_position_and_updates_name() {
        let mut map = PropertyMap::new();
        map.insert("a".into(), Value::from(1));
        map.insert("b".into(), Value::from(2));

        let tagged = PropertyName::new("a")
            .with_attributes(AttributeSet::from_pairs([("pinned", None)]).unwrap());
        let old = map.insert(tagged, Value::from(3));
        assert_eq!(old, Some(Value::from(1)));

        let names: Vec<&str> = map.names().map(PropertyName::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(map.get_name("a").unwrap().attributes().contains_key("pinned"));
        assert_eq!(map.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut map: PropertyMap = ["x", "y", "z"]
            .into_iter()
            .map(|n| (PropertyName::from(n), Value::from(n)))
            .collect();
        assert_eq!(map.remove("y"), Some(Value::from("y")));
        let names: Vec<&str> = map.names().map(PropertyName::as_str).collect();
        assert_eq!(names, vec!["x", "z"]);
        assert!(map.remove("missing").is_none());
    }
}
