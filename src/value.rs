//! The value model.
//!
//! [`Value`] is a closed union of ten kinds. Every kind carries a payload
//! that is either present or explicitly null, plus an [`AttributeSet`].
//!
//! ## Value kinds and reference kinds
//!
//! Boolean, Integer, Decimal, Duration, Timestamp and Blob are plain values
//! ([`Scalar`]); cloning copies them. String, Symbol, Sequence and Record
//! are reference kinds: cloning a [`Value`] of these kinds aliases the same
//! instance, and containers may contain themselves. The binary encoding
//! preserves that sharing.
//!
//! ## Creating Values
//!
//! ```rust
//! use binval::{AttributeSet, IntegerValue, Value, ValueKind};
//!
//! let flag = Value::from(true);
//! let answer = Value::from(42);
//! let text = Value::from("hello");
//! let missing = Value::null(ValueKind::Integer);
//!
//! let tagged = Value::Integer(
//!     IntegerValue::of(7).with_attributes(AttributeSet::from_pairs([("unit", Some("s"))]).unwrap()),
//! );
//! assert!(missing.is_null());
//! assert!(missing.is_default());
//! assert!(!tagged.attributes().is_empty());
//! ```
//!
//! ## Equality
//!
//! `==` compares structure, not identity, and terminates on cyclic graphs.
//! Use [`Value::ptr_eq`] to ask whether two handles are the same instance.

use crate::container::{RecordValue, SequenceValue, VisitGuard};
use crate::metadata::TypeTag;
use crate::text::{StringValue, SymbolValue};
use crate::{AttributeSet, Decimal, Error};
use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::BigInt;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

/// The ten value kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Integer,
    Decimal,
    Duration,
    Timestamp,
    String,
    Symbol,
    Blob,
    Sequence,
    Record,
}

impl ValueKind {
    /// Returns `true` for kinds with identity (String, Symbol, Sequence, Record).
    #[must_use]
    pub const fn is_reference_kind(self) -> bool {
        matches!(
            self,
            ValueKind::String | ValueKind::Symbol | ValueKind::Sequence | ValueKind::Record
        )
    }

    #[must_use]
    pub const fn tag(self) -> TypeTag {
        match self {
            ValueKind::Boolean => TypeTag::Boolean,
            ValueKind::Integer => TypeTag::Integer,
            ValueKind::Decimal => TypeTag::Decimal,
            ValueKind::Duration => TypeTag::Duration,
            ValueKind::Timestamp => TypeTag::Timestamp,
            ValueKind::String => TypeTag::String,
            ValueKind::Symbol => TypeTag::Symbol,
            ValueKind::Blob => TypeTag::Blob,
            ValueKind::Sequence => TypeTag::Sequence,
            ValueKind::Record => TypeTag::Record,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.tag().name()
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A plain (value-kind) payload with nullability and attributes.
///
/// # Examples
///
/// ```rust
/// use binval::IntegerValue;
///
/// let n = IntegerValue::of(5);
/// assert_eq!(n.value().map(|v| v.to_string()), Some("5".to_string()));
///
/// let missing = IntegerValue::null();
/// assert!(missing.is_null());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Scalar<T> {
    value: Option<T>,
    attributes: AttributeSet,
}

pub type BooleanValue = Scalar<bool>;
pub type IntegerValue = Scalar<BigInt>;
pub type DecimalValue = Scalar<Decimal>;
pub type DurationValue = Scalar<TimeDelta>;
pub type TimestampValue = Scalar<DateTime<Utc>>;
pub type BlobValue = Scalar<Vec<u8>>;

impl<T> Scalar<T> {
    pub fn of(value: impl Into<T>) -> Self {
        Scalar {
            value: Some(value.into()),
            attributes: AttributeSet::new(),
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Scalar {
            value: None,
            attributes: AttributeSet::new(),
        }
    }

    pub(crate) fn from_parts(value: Option<T>, attributes: AttributeSet) -> Self {
        Scalar { value, attributes }
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeSet) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Null with no attributes.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value.is_none() && self.attributes.is_empty()
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeSet {
        &mut self.attributes
    }
}

impl<T> Default for Scalar<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: fmt::Debug> fmt::Debug for Scalar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.attributes.is_empty() {
            write!(f, "[{}] ", self.attributes)?;
        }
        match &self.value {
            Some(value) => value.fmt(f),
            None => f.write_str("null"),
        }
    }
}

/// Any value of the model.
#[derive(Clone, Debug)]
pub enum Value {
    Boolean(BooleanValue),
    Integer(IntegerValue),
    Decimal(DecimalValue),
    Duration(DurationValue),
    Timestamp(TimestampValue),
    String(StringValue),
    Symbol(SymbolValue),
    Blob(BlobValue),
    Sequence(SequenceValue),
    Record(RecordValue),
}

impl Value {
    /// A null value of the given kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::{Value, ValueKind};
    ///
    /// let v = Value::null(ValueKind::Record);
    /// assert!(v.is_null());
    /// assert_eq!(v.kind(), ValueKind::Record);
    /// ```
    #[must_use]
    pub fn null(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Boolean => Value::Boolean(Scalar::null()),
            ValueKind::Integer => Value::Integer(Scalar::null()),
            ValueKind::Decimal => Value::Decimal(Scalar::null()),
            ValueKind::Duration => Value::Duration(Scalar::null()),
            ValueKind::Timestamp => Value::Timestamp(Scalar::null()),
            ValueKind::String => Value::String(StringValue::null()),
            ValueKind::Symbol => Value::Symbol(SymbolValue::null()),
            ValueKind::Blob => Value::Blob(Scalar::null()),
            ValueKind::Sequence => Value::Sequence(SequenceValue::null()),
            ValueKind::Record => Value::Record(RecordValue::null()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Duration(_) => ValueKind::Duration,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Blob(_) => ValueKind::Blob,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Record(_) => ValueKind::Record,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_reference_kind(&self) -> bool {
        self.kind().is_reference_kind()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Value::Boolean(v) => v.is_null(),
            Value::Integer(v) => v.is_null(),
            Value::Decimal(v) => v.is_null(),
            Value::Duration(v) => v.is_null(),
            Value::Timestamp(v) => v.is_null(),
            Value::String(v) => v.is_null(),
            Value::Symbol(v) => v.is_null(),
            Value::Blob(v) => v.is_null(),
            Value::Sequence(v) => v.is_null(),
            Value::Record(v) => v.is_null(),
        }
    }

    /// Null with no attributes. A null value may still carry attributes, in
    /// which case it is not the default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.is_null() && self.attributes().is_empty()
    }

    /// A copy of the value's attributes.
    #[must_use]
    pub fn attributes(&self) -> AttributeSet {
        match self {
            Value::Boolean(v) => v.attributes().clone(),
            Value::Integer(v) => v.attributes().clone(),
            Value::Decimal(v) => v.attributes().clone(),
            Value::Duration(v) => v.attributes().clone(),
            Value::Timestamp(v) => v.attributes().clone(),
            Value::String(v) => v.attributes().clone(),
            Value::Symbol(v) => v.attributes().clone(),
            Value::Blob(v) => v.attributes().clone(),
            Value::Sequence(v) => v.attributes(),
            Value::Record(v) => v.attributes(),
        }
    }

    /// Replaces the attributes.
    ///
    /// Containers are updated in place, so every alias sees the change;
    /// strings and symbols are immutable and yield a fresh instance.
    #[must_use]
    pub fn with_attributes(self, attributes: AttributeSet) -> Value {
        match self {
            Value::Boolean(v) => Value::Boolean(v.with_attributes(attributes)),
            Value::Integer(v) => Value::Integer(v.with_attributes(attributes)),
            Value::Decimal(v) => Value::Decimal(v.with_attributes(attributes)),
            Value::Duration(v) => Value::Duration(v.with_attributes(attributes)),
            Value::Timestamp(v) => Value::Timestamp(v.with_attributes(attributes)),
            Value::String(v) => Value::String(v.with_attributes(attributes)),
            Value::Symbol(v) => Value::Symbol(v.with_attributes(attributes)),
            Value::Blob(v) => Value::Blob(v.with_attributes(attributes)),
            Value::Sequence(v) => Value::Sequence(v.with_attributes(attributes)),
            Value::Record(v) => Value::Record(v.with_attributes(attributes)),
        }
    }

    /// Returns `true` if both are the same reference-kind instance.
    /// Always `false` for value kinds, which have no identity.
    #[must_use]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Address of the shared cell behind a reference-kind value.
    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Value::String(v) => Some(v.identity()),
            Value::Symbol(v) => Some(v.identity()),
            Value::Sequence(v) => Some(v.identity()),
            Value::Record(v) => Some(v.identity()),
            _ => None,
        }
    }

    /// Structural equality that terminates on cyclic graphs.
    ///
    /// Two containers are equal when their attributes match and their
    /// contents are pairwise equal; a pair of containers met again while it
    /// is already being compared is assumed equal. Record comparison ignores
    /// property order.
    #[must_use]
    pub fn value_equals(&self, other: &Value) -> bool {
        EqualityWalk::default().eq(self, other)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => v.value().copied(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(v) => v.value(),
            _ => None,
        }
    }

    /// The integer payload if it fits in an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_integer().and_then(|i| i64::try_from(i).ok())
    }

    #[must_use]
    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(v) => v.value(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_duration(&self) -> Option<&TimeDelta> {
        match self {
            Value::Duration(v) => v.value(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => v.value(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(v) => v.value().map(Vec::as_slice),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_string(&self) -> Option<&StringValue> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_symbol(&self) -> Option<&SymbolValue> {
        match self {
            Value::Symbol(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&SequenceValue> {
        match self {
            Value::Sequence(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(v) => Some(v),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        if self.is_null() {
            format!("null {}", self.kind())
        } else {
            self.kind().to_string()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.value_equals(other)
    }
}

#[derive(Default)]
struct EqualityWalk {
    assumed: HashSet<(usize, usize)>,
}

impl EqualityWalk {
    fn eq(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Boolean(x), Value::Boolean(y)) => x == y,
            (Value::Integer(x), Value::Integer(y)) => x == y,
            (Value::Decimal(x), Value::Decimal(y)) => x == y,
            (Value::Duration(x), Value::Duration(y)) => x == y,
            (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
            (Value::Blob(x), Value::Blob(y)) => x == y,
            (Value::String(x), Value::String(y)) => x.content_eq(y),
            (Value::Symbol(x), Value::Symbol(y)) => x.content_eq(y),
            (Value::Sequence(x), Value::Sequence(y)) => {
                if x.ptr_eq(y) || !self.assumed.insert((x.identity(), y.identity())) {
                    return true;
                }
                let (x, y) = (x.cell(), y.cell());
                if x.attributes != y.attributes {
                    return false;
                }
                match (&x.items, &y.items) {
                    (None, None) => true,
                    (Some(xs), Some(ys)) => {
                        xs.len() == ys.len() && xs.iter().zip(ys).all(|(a, b)| self.eq(a, b))
                    }
                    _ => false,
                }
            }
            (Value::Record(x), Value::Record(y)) => {
                if x.ptr_eq(y) || !self.assumed.insert((x.identity(), y.identity())) {
                    return true;
                }
                let (x, y) = (x.cell(), y.cell());
                if x.attributes != y.attributes {
                    return false;
                }
                match (&x.properties, &y.properties) {
                    (None, None) => true,
                    (Some(xs), Some(ys)) => {
                        xs.len() == ys.len()
                            && xs.iter().all(|(name, a)| {
                                ys.get_name(name.as_str()) == Some(name)
                                    && ys.get(name.as_str()).is_some_and(|b| self.eq(a, b))
                            })
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}

thread_local! {
    static SERIALIZE_ACTIVE: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Exports the value into any serde data format.
///
/// Nulls become `none`, integers that fit an `i64` become numbers and larger
/// ones, decimals and durations become strings, timestamps become RFC 3339
/// strings, blobs become bytes. Attributes are not exported. Shared
/// instances are written once per occurrence; a cycle is an error.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::{Error as _, SerializeMap, SerializeSeq};

        match self {
            Value::Boolean(v) => match v.value() {
                Some(b) => serializer.serialize_bool(*b),
                None => serializer.serialize_none(),
            },
            Value::Integer(v) => match v.value() {
                Some(i) => match i64::try_from(i) {
                    Ok(n) => serializer.serialize_i64(n),
                    Err(_) => serializer.collect_str(i),
                },
                None => serializer.serialize_none(),
            },
            Value::Decimal(v) => match v.value() {
                Some(d) => serializer.collect_str(d),
                None => serializer.serialize_none(),
            },
            Value::Duration(v) => match v.value() {
                Some(d) => serializer.collect_str(d),
                None => serializer.serialize_none(),
            },
            Value::Timestamp(v) => match v.value() {
                Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
                None => serializer.serialize_none(),
            },
            Value::String(v) => match v.to_string_lossy() {
                Some(text) => serializer.serialize_str(&text),
                None => serializer.serialize_none(),
            },
            Value::Symbol(v) => match v.as_str() {
                Some(text) => serializer.serialize_str(text),
                None => serializer.serialize_none(),
            },
            Value::Blob(v) => match v.value() {
                Some(bytes) => serializer.serialize_bytes(bytes),
                None => serializer.serialize_none(),
            },
            Value::Sequence(seq) if seq.is_null() => serializer.serialize_none(),
            Value::Record(record) if record.is_null() => serializer.serialize_none(),
            Value::Sequence(seq) => {
                let _guard = VisitGuard::enter(&SERIALIZE_ACTIVE, seq.identity())
                    .ok_or_else(|| S::Error::custom("cannot serialize a cyclic sequence"))?;
                let items = seq.items();
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Value::Record(record) => {
                let _guard = VisitGuard::enter(&SERIALIZE_ACTIVE, record.identity())
                    .ok_or_else(|| S::Error::custom("cannot serialize a cyclic record"))?;
                let entries = record.entries();
                let mut out = serializer.serialize_map(Some(entries.len()))?;
                for (name, value) in &entries {
                    out.serialize_entry(name.as_str(), value)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(Scalar::of(value))
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(Scalar::of(BigInt::from(value)))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::Integer(Scalar::of(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(Scalar::of(value))
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Value::Duration(Scalar::of(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(Scalar::of(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(StringValue::of(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(StringValue::of(&value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(Scalar::of(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Sequence(SequenceValue::of(value))
    }
}

macro_rules! variant_from {
    ($($variant:ident => $t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

variant_from!(
    Boolean => BooleanValue,
    Integer => IntegerValue,
    Decimal => DecimalValue,
    Duration => DurationValue,
    Timestamp => TimestampValue,
    Blob => BlobValue,
    String => StringValue,
    Symbol => SymbolValue,
    Sequence => SequenceValue,
    Record => RecordValue
);

fn expected(kind: ValueKind, found: &Value) -> Error {
    Error::custom(format!("expected {}, found {}", kind, found.describe()))
}

// TryFrom implementations for extracting payloads from Value
impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        value.as_bool().ok_or_else(|| expected(ValueKind::Boolean, &value))
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value.as_integer() {
            Some(i) => i64::try_from(i)
                .map_err(|_| Error::out_of_range(format!("integer {} does not fit in i64", i))),
            None => Err(expected(ValueKind::Integer, &value)),
        }
    }
}

impl TryFrom<Value> for BigInt {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Integer(v) if !v.is_null() => Ok(v.into_value().unwrap_or_default()),
            other => Err(expected(ValueKind::Integer, &other)),
        }
    }
}

impl TryFrom<Value> for Decimal {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Decimal(v) if !v.is_null() => Ok(v.into_value().unwrap_or_default()),
            other => Err(expected(ValueKind::Decimal, &other)),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match &value {
            Value::String(s) => s
                .to_string_checked()?
                .ok_or_else(|| expected(ValueKind::String, &value)),
            _ => Err(expected(ValueKind::String, &value)),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Blob(v) if !v.is_null() => Ok(v.into_value().unwrap_or_default()),
            other => Err(expected(ValueKind::Blob, &other)),
        }
    }
}

impl TryFrom<Value> for SequenceValue {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Sequence(v) => Ok(v),
            other => Err(expected(ValueKind::Sequence, &other)),
        }
    }
}

impl TryFrom<Value> for RecordValue {
    type Error = Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Record(v) => Ok(v),
            other => Err(expected(ValueKind::Record, &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::PropertyName;

    fn attrs(pairs: &[(&str, Option<&str>)]) -> AttributeSet {
        AttributeSet::from_pairs(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_null_default_invariant() {
        for kind in [
            ValueKind::Boolean,
            ValueKind::Integer,
            ValueKind::Decimal,
            ValueKind::Duration,
            ValueKind::Timestamp,
            ValueKind::String,
            ValueKind::Symbol,
            ValueKind::Blob,
            ValueKind::Sequence,
            ValueKind::Record,
        ] {
            let null = Value::null(kind);
            assert!(null.is_null());
            assert!(null.is_default());
            assert_eq!(null.kind(), kind);

            let typed_null = Value::null(kind).with_attributes(attrs(&[("placeholder", None)]));
            assert!(typed_null.is_null());
            assert!(!typed_null.is_default());
        }
        assert!(!Value::from(0).is_default());
    }

    #[test]
    fn test_reference_kinds() {
        assert!(Value::from("x").is_reference_kind());
        assert!(Value::from(Vec::<Value>::new()).is_reference_kind());
        assert!(!Value::from(vec![1u8, 2]).is_reference_kind());
        assert!(!Value::from(1).is_reference_kind());

        let a = Value::from(1);
        assert!(!a.ptr_eq(&a.clone()));
        let s = Value::from("x");
        assert!(s.ptr_eq(&s.clone()));
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::from(vec![Value::from(1), Value::from("two")]);
        let b = Value::from(vec![Value::from(1), Value::from("two")]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));

        let c = Value::from(vec![Value::from(1), Value::from("three")]);
        assert_ne!(a, c);

        assert_ne!(
            Value::null(ValueKind::Sequence),
            Value::Sequence(SequenceValue::empty())
        );
        assert_ne!(Value::from(1), Value::from(true));
    }

    #[test]
    fn test_record_equality_ignores_order_but_not_name_attributes() {
        let a = RecordValue::of([("x", Value::from(1)), ("y", Value::from(2))]);
        let b = RecordValue::of([("y", Value::from(2)), ("x", Value::from(1))]);
        assert_eq!(Value::Record(a.clone()), Value::Record(b));

        let c = RecordValue::empty();
        c.set(
            PropertyName::new("x").with_attributes(attrs(&[("key", None)])),
            Value::from(1),
        );
        c.set("y", Value::from(2));
        assert_ne!(Value::Record(a), Value::Record(c));
    }

    #[test]
    fn test_cyclic_equality_terminates() {
        let a = RecordValue::empty();
        a.set("self", Value::Record(a.clone()));
        let b = RecordValue::empty();
        b.set("self", Value::Record(b.clone()));
        assert_eq!(Value::Record(a.clone()), Value::Record(b.clone()));

        b.set("extra", Value::from(1));
        assert_ne!(Value::Record(a.clone()), Value::Record(b.clone()));
        a.clear();
        b.clear();
    }

    #[test]
    fn test_tryfrom() {
        assert_eq!(i64::try_from(Value::from(42)).unwrap(), 42);
        assert!(i64::try_from(Value::from("42")).is_err());
        assert!(i64::try_from(Value::from(BigInt::from(u64::MAX) * 4)).is_err());
        assert!(bool::try_from(Value::null(ValueKind::Boolean)).is_err());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");
        assert_eq!(Vec::<u8>::try_from(Value::from(vec![1u8])).unwrap(), vec![1]);

        let err = SequenceValue::try_from(Value::from(1)).unwrap_err();
        assert!(err.to_string().contains("expected Sequence, found Integer"));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Value::from(7)), "Integer(7)");
        assert_eq!(
            format!("{:?}", Value::null(ValueKind::Blob)),
            "Blob(null)"
        );
        let tagged = Value::from(true).with_attributes(attrs(&[("a", Some("1"))]));
        assert_eq!(format!("{:?}", tagged), "Boolean([a:1] true)");
    }

    #[test]
    fn test_serde_export() {
        let record = RecordValue::of([
            ("name", Value::from("Alice")),
            ("age", Value::from(30)),
            ("tags", Value::from(vec![Value::from("a"), Value::null(ValueKind::String)])),
        ]);
        let json = serde_json::to_string(&Value::Record(record)).unwrap();
        assert_eq!(json, r#"{"name":"Alice","age":30,"tags":["a",null]}"#);

        let big = Value::from(BigInt::from(u64::MAX) * 10);
        assert_eq!(
            serde_json::to_string(&big).unwrap(),
            "\"184467440737095516150\""
        );
    }

    #[test]
    fn test_serde_export_rejects_cycles_but_allows_sharing() {
        let shared = Value::from(vec![Value::from(1)]);
        let dag = Value::from(vec![shared.clone(), shared]);
        assert_eq!(serde_json::to_string(&dag).unwrap(), "[[1],[1]]");

        let seq = SequenceValue::empty();
        seq.push(Value::Sequence(seq.clone()));
        let err = serde_json::to_string(&Value::Sequence(seq.clone())).unwrap_err();
        assert!(err.to_string().contains("cyclic"));
        seq.clear();
    }
}
