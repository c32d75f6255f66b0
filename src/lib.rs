//! # binval
//!
//! A self-describing value model and a compact binary encoding for it.
//!
//! ## What is in the box?
//!
//! - **Ten value kinds**: Boolean, Integer, Decimal, Duration, Timestamp,
//!   String, Symbol, Blob, Sequence and Record. Each can be explicitly null
//!   and each carries a set of `key` / `key:value` attributes.
//! - **Compact headers**: one byte per value for zeros, empties, nulls and
//!   booleans; varint continuation bytes only when a length or magnitude is
//!   actually needed.
//! - **Arbitrary precision**: integers and decimal significands are
//!   [`num_bigint::BigInt`], written as sign-in-header plus unsigned
//!   little-endian magnitude.
//! - **Sharing and cycles**: strings, symbols, sequences and records have
//!   identity. An instance that appears several times in a graph (even inside
//!   itself) is written once and referenced afterwards, and decodes back to a
//!   single shared instance.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! binval = "0.1"
//! ```
//!
//! ### Encoding and decoding
//!
//! ```rust
//! use binval::{from_slice, to_vec, RecordValue, Value};
//!
//! let user = RecordValue::of([
//!     ("id", Value::from(123)),
//!     ("name", Value::from("Alice")),
//!     ("active", Value::from(true)),
//! ]);
//!
//! let bytes = to_vec(&Value::Record(user.clone())).unwrap();
//! let back = from_slice(&bytes).unwrap();
//! assert_eq!(back, Value::Record(user));
//! ```
//!
//! ### Cyclic graphs
//!
//! ```rust
//! use binval::{from_slice, to_vec, RecordValue, Value};
//!
//! let node = RecordValue::empty();
//! node.set("name", Value::from("loop"));
//! node.set("next", Value::Record(node.clone()));
//!
//! let bytes = to_vec(&Value::Record(node.clone())).unwrap();
//! let back = from_slice(&bytes).unwrap();
//!
//! let record = back.as_record().unwrap();
//! assert!(record.get("next").unwrap().ptr_eq(&back));
//!
//! // Rc cycles are not collected on their own
//! record.clear();
//! node.clear();
//! ```
//!
//! ### Building values with macros
//!
//! ```rust
//! use binval::value;
//!
//! let data = value!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "binary"]
//! });
//! assert_eq!(data.as_record().unwrap().len(), 3);
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code
//! - Decoding never allocates more than the input actually supplies, and
//!   declared lengths and nesting are bounded by [`CodecOptions`]
//! - Every decoding error reports the byte offset where it was detected
//!
//! ## Format Specification
//!
//! The byte layout is documented in the [`format`] module.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - encode and decode a record
//! - **`macro.rs`** - building values with `value!`, `sequence!` and `record!`
//! - **`cyclic_graph.rs`** - self-referential and shared structures
//! - **`attributes.rs`** - annotating values and property names
//!
//! Run any example with: `cargo run --example <name>`

#![forbid(unsafe_code)]

pub mod attribute;
pub mod container;
pub mod de;
pub mod decimal;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod metadata;
pub mod options;
pub mod scalar;
pub mod ser;
pub mod stream;
pub mod text;
pub mod tracker;
pub mod value;
pub mod varint;

pub use attribute::{Attribute, AttributeSet};
pub use container::{RecordValue, SequenceValue};
pub use de::Deserializer;
pub use decimal::Decimal;
pub use error::{Error, Result};
pub use map::{PropertyMap, PropertyName};
pub use metadata::{TypeMetadata, TypeTag};
pub use options::CodecOptions;
pub use ser::Serializer;
pub use text::{StringValue, SymbolValue};
pub use value::{
    BlobValue, BooleanValue, DecimalValue, DurationValue, IntegerValue, Scalar, TimestampValue,
    Value, ValueKind,
};

use std::io;

/// Encodes a value into a new byte vector.
///
/// # Examples
///
/// ```rust
/// use binval::{to_vec, Value};
///
/// assert_eq!(to_vec(&Value::from(0)).unwrap(), vec![0x02]);
/// assert_eq!(to_vec(&Value::from(true)).unwrap(), vec![0x41]);
/// ```
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] if containers nest deeper than the
/// default limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(value: &Value) -> Result<Vec<u8>> {
    to_vec_with_options(value, CodecOptions::default())
}

/// Encodes a value into a new byte vector with custom options.
///
/// # Errors
///
/// Returns [`Error::DepthLimitExceeded`] if containers nest deeper than
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options(value: &Value, options: CodecOptions) -> Result<Vec<u8>> {
    let mut serializer = Serializer::with_options(Vec::with_capacity(64), options);
    serializer.write_value(value)?;
    Ok(serializer.into_inner())
}

/// Encodes a value into a writer.
///
/// # Examples
///
/// ```rust
/// use binval::{to_writer, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::from("hi")).unwrap();
/// assert_eq!(buffer, vec![0x86, 0x02, b'h', 0, b'i', 0]);
/// ```
///
/// # Errors
///
/// Returns an error if writing fails or the nesting limit is exceeded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, CodecOptions::default())
}

/// Encodes a value into a writer with custom options.
///
/// # Errors
///
/// Returns an error if writing fails or the nesting limit is exceeded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(writer: W, value: &Value, options: CodecOptions) -> Result<()>
where
    W: io::Write,
{
    let mut serializer = Serializer::with_options(writer, options);
    serializer.write_value(value)?;
    serializer.flush()
}

/// Decodes exactly one value from a byte slice.
///
/// # Examples
///
/// ```rust
/// use binval::{from_slice, Error, Value};
///
/// assert_eq!(from_slice(&[0x41]).unwrap(), Value::from(true));
/// assert!(matches!(from_slice(&[0x41, 0x41]), Err(Error::TrailingBytes { offset: 1 })));
/// ```
///
/// # Errors
///
/// Returns an error if the bytes are not a valid encoding, or if bytes remain
/// after the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Value> {
    from_slice_with_options(bytes, CodecOptions::default())
}

/// Decodes exactly one value from a byte slice with custom options.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid encoding, a limit in
/// `options` is exceeded, or bytes remain after the value.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options(bytes: &[u8], options: CodecOptions) -> Result<Value> {
    let mut deserializer = Deserializer::with_options(bytes, options);
    let value = deserializer.read_value()?;
    deserializer.end()?;
    Ok(value)
}

/// Decodes one value from a reader.
///
/// Reads only as many bytes as the value needs; anything after it is left
/// in the reader. Headers and varints are read a byte at a time, so wrap
/// files and sockets in a [`std::io::BufReader`] first.
///
/// # Examples
///
/// ```rust
/// use binval::{from_reader, Value};
/// use std::io::Cursor;
///
/// let cursor = Cursor::new(vec![0x82, 0x03, 0x2a]);
/// assert_eq!(from_reader(cursor).unwrap(), Value::from(42));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails or the bytes are not a valid encoding.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(reader: R) -> Result<Value>
where
    R: io::Read,
{
    from_reader_with_options(reader, CodecOptions::default())
}

/// Decodes one value from a reader with custom options.
///
/// # Errors
///
/// Returns an error if reading fails, the bytes are not a valid encoding, or
/// a limit in `options` is exceeded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader_with_options<R>(reader: R, options: CodecOptions) -> Result<Value>
where
    R: io::Read,
{
    Deserializer::with_options(reader, options).read_value()
}
