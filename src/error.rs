//! Error types for binval encoding and decoding.
//!
//! Decoding errors carry the byte offset at which the problem was detected so
//! a corrupt or hand-crafted stream can be diagnosed without a hex dump.
//!
//! ## Error Categories
//!
//! - **Truncation**: the stream ended before a declared length, count or
//!   varint terminated
//! - **Type Mismatches**: a payload codec was invoked on a header of another type
//! - **Dangling References**: a reference names an address that was never allocated
//! - **Construction Errors**: malformed attribute keys or symbol text, raised by
//!   the value model independently of any codec
//! - **Limits**: nesting depth or a declared length exceeded [`CodecOptions`](crate::CodecOptions)
//!
//! ## Examples
//!
//! ```rust
//! use binval::{from_slice, Error};
//!
//! // An Integer header declaring a 4-byte magnitude, followed by only 1 byte.
//! let result = from_slice(&[0x82, 0x09, 0x01]);
//! assert!(matches!(result, Err(Error::Truncated { .. })));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while building, encoding or
/// decoding values.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The stream ended before the declared data was available
    #[error("Unexpected end of stream at byte {offset} while reading {context}")]
    Truncated { offset: u64, context: String },

    /// A payload codec was invoked against a header declaring another type
    #[error("Type mismatch at byte {offset}: expected {expected}, found {found}")]
    TypeMismatch {
        offset: u64,
        expected: String,
        found: String,
    },

    /// The low bits of a header byte do not name a known type
    #[error("Unknown type tag {tag} at byte {offset}")]
    UnknownTypeTag { offset: u64, tag: u8 },

    /// Header flags or custom metadata are inconsistent with the type
    #[error("Invalid type metadata at byte {offset}: {msg}")]
    InvalidMetadata { offset: u64, msg: String },

    /// A reference names an address that has not been allocated
    #[error("Dangling reference at byte {offset}: address {address} was never allocated")]
    DanglingReference { offset: u64, address: u64 },

    /// A varint does not fit the integer it is decoded into
    #[error("Varint at byte {offset} overflows 64 bits")]
    VarintOverflow { offset: u64 },

    /// Attribute key does not match `[A-Za-z_]([.\-]?[A-Za-z0-9_])*`
    #[error("Invalid attribute key: {0:?}")]
    InvalidAttributeKey(String),

    /// Symbol text contains a character outside the single-byte range
    #[error("Invalid symbol: {0:?} (symbols are limited to U+0000..=U+00FF)")]
    InvalidSymbol(String),

    /// Attribute or property name bytes are not UTF-8
    #[error("Invalid UTF-8 at byte {offset} in {context}")]
    InvalidUtf8 { offset: u64, context: String },

    /// A decoded magnitude does not fit the target type
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Nesting deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// A declared length or count larger than the configured limit
    #[error("Declared length {declared} exceeds the limit of {limit}")]
    LengthLimitExceeded { declared: u64, limit: u64 },

    /// Bytes remain after the root value
    #[error("Trailing bytes after the root value at byte {offset}")]
    TrailingBytes { offset: u64 },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a truncation error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::Error;
    ///
    /// let err = Error::truncated(7, "blob body");
    /// assert!(err.to_string().contains("byte 7"));
    /// ```
    pub fn truncated(offset: u64, context: &str) -> Self {
        Error::Truncated {
            offset,
            context: context.to_string(),
        }
    }

    /// Creates a type mismatch error when a codec meets a header of another type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::Error;
    ///
    /// let err = Error::type_mismatch(0, "Integer", "Blob");
    /// assert!(err.to_string().contains("expected Integer"));
    /// ```
    pub fn type_mismatch(offset: u64, expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            offset,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid metadata error.
    pub fn invalid_metadata(offset: u64, msg: &str) -> Self {
        Error::InvalidMetadata {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates an invalid UTF-8 error.
    pub fn invalid_utf8(offset: u64, context: &str) -> Self {
        Error::InvalidUtf8 {
            offset,
            context: context.to_string(),
        }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range<T: fmt::Display>(msg: T) -> Self {
        Error::ValueOutOfRange(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binval::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for errors caused by a stream that ended early.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }

    /// Maps an I/O error raised at `offset`, turning EOF into [`Error::Truncated`].
    pub(crate) fn from_io(err: &io::Error, offset: u64, context: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::truncated(offset, context)
        } else {
            Error::io(&err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
