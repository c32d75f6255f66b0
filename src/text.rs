//! Shared text values: [`StringValue`] and [`SymbolValue`].
//!
//! Both are reference kinds. Cloning one aliases the same instance, and the
//! encoder writes an aliased instance once and refers back to it afterwards.
//! The text itself is immutable once built.
//!
//! Strings hold UTF-16 code units verbatim, so unpaired surrogates survive a
//! round trip. Symbols are short identifier-like names restricted to one byte
//! per character (U+0000 through U+00FF).

use crate::{AttributeSet, Error, Result};
use std::fmt;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq)]
struct TextCell<T> {
    text: Option<T>,
    attributes: AttributeSet,
}

/// A shared, possibly null, UTF-16 text buffer.
///
/// # Examples
///
/// ```rust
/// use binval::StringValue;
///
/// let s = StringValue::of("héllo");
/// assert_eq!(s.len(), Some(5));
/// assert_eq!(s.to_string_lossy().as_deref(), Some("héllo"));
///
/// let alias = s.clone();
/// assert!(alias.ptr_eq(&s));
/// ```
#[derive(Clone)]
pub struct StringValue(Rc<TextCell<Box<[u16]>>>);

impl StringValue {
    pub fn of(text: &str) -> Self {
        Self::from_utf16(text.encode_utf16().collect())
    }

    /// Wraps raw code units without validating them.
    pub fn from_utf16(units: Vec<u16>) -> Self {
        Self::build(Some(units.into_boxed_slice()), AttributeSet::new())
    }

    pub fn null() -> Self {
        Self::build(None, AttributeSet::new())
    }

    fn build(text: Option<Box<[u16]>>, attributes: AttributeSet) -> Self {
        StringValue(Rc::new(TextCell { text, attributes }))
    }

    /// Returns a new instance with the same text and the given attributes.
    #[must_use]
    pub fn with_attributes(self, attributes: AttributeSet) -> Self {
        Self::build(self.0.text.clone(), attributes)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.text.is_none()
    }

    #[must_use]
    pub fn units(&self) -> Option<&[u16]> {
        self.0.text.as_deref()
    }

    /// Number of UTF-16 code units.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        self.units().map(<[u16]>::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Decodes the text, replacing unpaired surrogates with U+FFFD.
    #[must_use]
    pub fn to_string_lossy(&self) -> Option<String> {
        self.units().map(String::from_utf16_lossy)
    }

    /// Decodes the text, failing on unpaired surrogates.
    pub fn to_string_checked(&self) -> Result<Option<String>> {
        self.units()
            .map(|units| {
                String::from_utf16(units).map_err(|_| Error::custom("unpaired UTF-16 surrogate"))
            })
            .transpose()
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.0.attributes
    }

    /// Returns `true` if both handles refer to the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn content_eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("String");
        match self.to_string_lossy() {
            Some(text) => t.field(&text),
            None => t.field(&"null"),
        };
        if !self.attributes().is_empty() {
            t.field(&self.attributes().to_string());
        }
        t.finish()
    }
}

/// A shared, possibly null, single-byte-per-character name.
///
/// # Examples
///
/// ```rust
/// use binval::SymbolValue;
///
/// let sym = SymbolValue::of("color.red").unwrap();
/// assert_eq!(sym.as_str(), Some("color.red"));
///
/// assert!(SymbolValue::of("snow☃").is_err());
/// ```
#[derive(Clone)]
pub struct SymbolValue(Rc<TextCell<Box<str>>>);

impl SymbolValue {
    /// Creates a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSymbol`] if any character is above U+00FF.
    pub fn of(text: &str) -> Result<Self> {
        if text.chars().any(|c| u32::from(c) > 0xff) {
            return Err(Error::InvalidSymbol(text.to_string()));
        }
        Ok(Self::build(Some(text.into()), AttributeSet::new()))
    }

    /// Builds a symbol from its one-byte-per-character encoding.
    pub fn from_latin1(bytes: &[u8]) -> Self {
        let text: String = bytes.iter().map(|&b| char::from(b)).collect();
        Self::build(Some(text.into_boxed_str()), AttributeSet::new())
    }

    pub fn null() -> Self {
        Self::build(None, AttributeSet::new())
    }

    fn build(text: Option<Box<str>>, attributes: AttributeSet) -> Self {
        SymbolValue(Rc::new(TextCell { text, attributes }))
    }

    #[must_use]
    pub fn with_attributes(self, attributes: AttributeSet) -> Self {
        Self::build(self.0.text.clone(), attributes)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.text.is_none()
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.text.as_deref()
    }

    /// The one-byte-per-character encoding of the symbol.
    #[must_use]
    pub fn to_latin1(&self) -> Option<Vec<u8>> {
        // every char was checked to be <= U+00FF on construction
        self.as_str()
            .map(|text| text.chars().map(|c| u32::from(c) as u8).collect())
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.0.attributes
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub(crate) fn content_eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl fmt::Debug for SymbolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple("Symbol");
        match self.as_str() {
            Some(text) => t.field(&text),
            None => t.field(&"null"),
        };
        if !self.attributes().is_empty() {
            t.field(&self.attributes().to_string());
        }
        t.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpaired_surrogate_is_kept() {
        let s = StringValue::from_utf16(vec![0x0041, 0xd800, 0x0042]);
        assert_eq!(s.units(), Some(&[0x0041, 0xd800, 0x0042][..]));
        assert_eq!(s.to_string_lossy().as_deref(), Some("A\u{fffd}B"));
        assert!(s.to_string_checked().is_err());
    }

    #[test]
    fn test_null_and_empty_differ() {
        let null = StringValue::null();
        let empty = StringValue::of("");
        assert!(null.is_null());
        assert_eq!(null.len(), None);
        assert!(!empty.is_null());
        assert!(empty.is_empty());
        assert!(!null.content_eq(&empty));
    }

    #[test]
    fn test_content_equality_ignores_identity() {
        let a = StringValue::of("same");
        let b = StringValue::of("same");
        assert!(!a.ptr_eq(&b));
        assert!(a.content_eq(&b));

        let annotated =
            b.with_attributes(AttributeSet::from_pairs([("lang", Some("en"))]).unwrap());
        assert!(!a.content_eq(&annotated));
    }

    #[test]
    fn test_symbol_latin1() {
        let sym = SymbolValue::of("caf\u{e9}").unwrap();
        assert_eq!(sym.to_latin1(), Some(vec![b'c', b'a', b'f', 0xe9]));
        let back = SymbolValue::from_latin1(&[b'c', b'a', b'f', 0xe9]);
        assert!(sym.content_eq(&back));

        assert!(matches!(
            SymbolValue::of("\u{100}"),
            Err(Error::InvalidSymbol(_))
        ));
    }
}
