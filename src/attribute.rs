//! Attributes and attribute sets.
//!
//! Every [`Value`](crate::Value) carries an [`AttributeSet`]: an unordered
//! set of `(key, optional value)` pairs. Keys are identifier-like and are
//! validated at construction, so a set can never hold a malformed attribute.
//!
//! ## Examples
//!
//! ```rust
//! use binval::{Attribute, AttributeSet};
//!
//! let a = AttributeSet::from_pairs([("unit", Some("ms")), ("deprecated", None)]).unwrap();
//! let b = AttributeSet::from_pairs([("deprecated", None), ("unit", Some("ms"))]).unwrap();
//! assert_eq!(a, b);
//!
//! assert!(Attribute::new("9lives", None).is_err());
//! ```

use crate::stream::{ByteReader, ByteWriter};
use crate::{varint, Error, Result};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, Write};

/// A single `key` or `key:value` annotation.
///
/// Attributes order lexicographically by their rendered `key:value` text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    key: String,
    value: Option<String>,
}

/// Returns `true` if `key` matches `[A-Za-z_]([.\-]?[A-Za-z0-9_])*`.
///
/// # Examples
///
/// ```rust
/// use binval::attribute::is_valid_key;
///
/// assert!(is_valid_key("content-type"));
/// assert!(is_valid_key("a.b_c"));
/// assert!(!is_valid_key("a..b"));
/// assert!(!is_valid_key("trailing-"));
/// ```
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    let mut bytes = key.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    let mut after_separator = false;
    for b in bytes {
        if b == b'.' || b == b'-' {
            if after_separator {
                return false;
            }
            after_separator = true;
        } else if b.is_ascii_alphanumeric() || b == b'_' {
            after_separator = false;
        } else {
            return false;
        }
    }
    !after_separator
}

impl Attribute {
    /// Creates an attribute, validating the key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributeKey`] if the key is not identifier-like.
    pub fn new(key: impl Into<String>, value: Option<&str>) -> Result<Self> {
        let key = key.into();
        if !is_valid_key(&key) {
            return Err(Error::InvalidAttributeKey(key));
        }
        Ok(Attribute {
            key,
            value: value.map(str::to_string),
        })
    }

    /// Creates a value-less attribute.
    pub fn flag(key: impl Into<String>) -> Result<Self> {
        Self::new(key, None)
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn rendered(&self) -> impl Iterator<Item = u8> + '_ {
        let value = self
            .value
            .iter()
            .flat_map(|v| std::iter::once(b':').chain(v.bytes()));
        self.key.bytes().chain(value)
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        // keys never contain ':' so the rendering is injective
        self.rendered().cmp(other.rendered())
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.key, value),
            None => write!(f, "{}", self.key),
        }
    }
}

/// An unordered set of unique attributes.
///
/// The default set and an explicitly empty set both mean "no attributes" and
/// compare equal. Iteration is in canonical (lexicographic) order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet(BTreeSet<Attribute>);

impl AttributeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        AttributeSet(BTreeSet::new())
    }

    /// Builds a set from `(key, value)` pairs, validating every key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAttributeKey`] for the first malformed key.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        pairs
            .into_iter()
            .map(|(key, value)| Attribute::new(key, value))
            .collect()
    }

    /// Adds an attribute. Returns `false` if an identical one was present.
    pub fn insert(&mut self, attribute: Attribute) -> bool {
        self.0.insert(attribute)
    }

    /// Removes every attribute with the given key, returning how many went.
    pub fn remove_key(&mut self, key: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|a| a.key != key);
        before - self.0.len()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|a| a.key == key)
    }

    /// Returns the value of the first attribute with `key`, in canonical order.
    ///
    /// The outer `Option` is `None` when the key is absent; the inner one is
    /// `None` for a value-less attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.iter().find(|a| a.key == key).map(Attribute::value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut ByteWriter<W>) -> Result<()> {
        varint::write_u64(writer, self.0.len() as u64)?;
        for attribute in &self.0 {
            write_text(writer, &attribute.key)?;
            match &attribute.value {
                Some(value) => {
                    writer.write_u8(1)?;
                    write_text(writer, value)?;
                }
                None => writer.write_u8(0)?,
            }
        }
        Ok(())
    }

    pub(crate) fn read_from<R: Read>(reader: &mut ByteReader<R>, max_length: u64) -> Result<Self> {
        let count = reader.read_length(max_length, "attribute count")?;
        let mut set = AttributeSet::new();
        for _ in 0..count {
            let offset = reader.offset();
            let key = read_text(reader, max_length, "attribute key")?;
            let value = match reader.read_u8("attribute presence flag")? {
                0 => None,
                1 => Some(read_text(reader, max_length, "attribute value")?),
                other => {
                    return Err(Error::invalid_metadata(
                        offset,
                        &format!("attribute presence flag must be 0 or 1, found {}", other),
                    ))
                }
            };
            if !is_valid_key(&key) {
                return Err(Error::InvalidAttributeKey(key));
            }
            set.insert(Attribute { key, value });
        }
        Ok(set)
    }
}

/// Writes a varint length followed by UTF-8 bytes.
pub(crate) fn write_text<W: Write>(writer: &mut ByteWriter<W>, text: &str) -> Result<()> {
    varint::write_u64(writer, text.len() as u64)?;
    writer.write_all(text.as_bytes())
}

/// Reads a varint length followed by UTF-8 bytes.
pub(crate) fn read_text<R: Read>(
    reader: &mut ByteReader<R>,
    max_length: u64,
    context: &str,
) -> Result<String> {
    let len = reader.read_length(max_length, context)?;
    let offset = reader.offset();
    let bytes = reader.read_bytes(len, context)?;
    String::from_utf8(bytes).map_err(|_| Error::invalid_utf8(offset, context))
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attribute) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", attribute)?;
        }
        Ok(())
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        AttributeSet(iter.into_iter().collect())
    }
}

impl Extend<Attribute> for AttributeSet {
    fn extend<T: IntoIterator<Item = Attribute>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::collections::btree_set::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Attribute> for AttributeSet {
    fn from(attribute: Attribute) -> Self {
        std::iter::once(attribute).collect()
    }
}
