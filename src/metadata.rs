//! Per-value type headers.
//!
//! Every encoded value starts with one fixed byte:
//!
//! ```text
//!  7          6        5           4      3..0
//! [Overflow] [Custom] [Annotated] [Null] [type tag]
//! ```
//!
//! When `Overflow` is set a varint follows carrying the type's custom
//! metadata (a count, an address, or a packed sign/byte-count word). A
//! payload of zero is always written with `Overflow` clear, so zero, empty
//! and address 0 all cost a single header byte.

use crate::stream::{ByteReader, ByteWriter};
use crate::{varint, Error, Result};
use std::fmt;
use std::io::{Read, Write};

const TAG_MASK: u8 = 0x0f;
const NULL: u8 = 0x10;
const ANNOTATED: u8 = 0x20;
const CUSTOM: u8 = 0x40;
const OVERFLOW: u8 = 0x80;

/// The closed set of wire types: ten value kinds plus the reference marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Boolean = 1,
    Integer = 2,
    Decimal = 3,
    Duration = 4,
    Timestamp = 5,
    String = 6,
    Symbol = 7,
    Blob = 8,
    Sequence = 9,
    Record = 10,
    Reference = 11,
}

impl TypeTag {
    /// Parses the low four bits of a header byte.
    pub fn from_bits(bits: u8, offset: u64) -> Result<Self> {
        Ok(match bits {
            1 => TypeTag::Boolean,
            2 => TypeTag::Integer,
            3 => TypeTag::Decimal,
            4 => TypeTag::Duration,
            5 => TypeTag::Timestamp,
            6 => TypeTag::String,
            7 => TypeTag::Symbol,
            8 => TypeTag::Blob,
            9 => TypeTag::Sequence,
            10 => TypeTag::Record,
            11 => TypeTag::Reference,
            tag => return Err(Error::UnknownTypeTag { offset, tag }),
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Boolean => "Boolean",
            TypeTag::Integer => "Integer",
            TypeTag::Decimal => "Decimal",
            TypeTag::Duration => "Duration",
            TypeTag::Timestamp => "Timestamp",
            TypeTag::String => "String",
            TypeTag::Symbol => "Symbol",
            TypeTag::Blob => "Blob",
            TypeTag::Sequence => "Sequence",
            TypeTag::Record => "Record",
            TypeTag::Reference => "Reference",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed or about-to-be-written header.
///
/// Computed fresh for every value on every encode; never cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeMetadata {
    pub tag: TypeTag,
    pub null: bool,
    pub annotated: bool,
    pub custom_flag: bool,
    /// Custom metadata payload; zero when absent.
    pub custom: u64,
    /// Stream offset of the header byte (zero for headers built for writing).
    pub offset: u64,
}

impl TypeMetadata {
    #[must_use]
    pub fn new(tag: TypeTag) -> Self {
        TypeMetadata {
            tag,
            null: false,
            annotated: false,
            custom_flag: false,
            custom: 0,
            offset: 0,
        }
    }

    #[must_use]
    pub fn null(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    #[must_use]
    pub fn annotated(mut self, annotated: bool) -> Self {
        self.annotated = annotated;
        self
    }

    #[must_use]
    pub fn custom_flag(mut self, flag: bool) -> Self {
        self.custom_flag = flag;
        self
    }

    #[must_use]
    pub fn custom(mut self, custom: u64) -> Self {
        self.custom = custom;
        self
    }

    /// Returns `true` when continuation bytes follow the fixed byte.
    #[inline]
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.custom != 0
    }

    #[must_use]
    pub fn header_byte(&self) -> u8 {
        let mut byte = self.tag as u8;
        if self.null {
            byte |= NULL;
        }
        if self.annotated {
            byte |= ANNOTATED;
        }
        if self.custom_flag {
            byte |= CUSTOM;
        }
        if self.has_overflow() {
            byte |= OVERFLOW;
        }
        byte
    }

    pub fn write_to<W: Write>(&self, writer: &mut ByteWriter<W>) -> Result<()> {
        writer.write_u8(self.header_byte())?;
        if self.has_overflow() {
            varint::write_u64(writer, self.custom)?;
        }
        Ok(())
    }

    /// Reads and validates a header.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownTypeTag`] for tags outside the closed set and
    /// [`Error::InvalidMetadata`] for flag combinations no encoder produces.
    pub fn read_from<R: Read>(reader: &mut ByteReader<R>) -> Result<Self> {
        let offset = reader.offset();
        let byte = reader.read_u8("type metadata")?;
        let tag = TypeTag::from_bits(byte & TAG_MASK, offset)?;
        let custom = if byte & OVERFLOW != 0 {
            varint::read_u64(reader, "custom metadata")?
        } else {
            0
        };
        let meta = TypeMetadata {
            tag,
            null: byte & NULL != 0,
            annotated: byte & ANNOTATED != 0,
            custom_flag: byte & CUSTOM != 0,
            custom,
            offset,
        };
        meta.validate()?;
        Ok(meta)
    }

    fn validate(&self) -> Result<()> {
        if self.tag == TypeTag::Reference {
            if self.null || self.annotated || self.custom_flag {
                return Err(Error::invalid_metadata(
                    self.offset,
                    "a reference carries only an address",
                ));
            }
            return Ok(());
        }
        if self.null && self.custom != 0 {
            return Err(Error::invalid_metadata(
                self.offset,
                &format!("null {} with custom metadata {}", self.tag, self.custom),
            ));
        }
        if self.custom_flag && (self.tag != TypeTag::Boolean || self.null) {
            return Err(Error::invalid_metadata(
                self.offset,
                &format!("custom flag is not defined for {}", self.describe()),
            ));
        }
        // zero is written as custom 0, so a sign without magnitude bytes never occurs
        let empty_magnitude = match self.tag {
            TypeTag::Boolean => self.custom != 0,
            TypeTag::Integer | TypeTag::Duration | TypeTag::Timestamp => {
                self.custom != 0 && unpack_signed_count(self.custom).1 == 0
            }
            TypeTag::Decimal => self.custom != 0 && unpack_decimal(self.custom).2 == 0,
            _ => false,
        };
        if empty_magnitude {
            return Err(Error::invalid_metadata(
                self.offset,
                &format!("non-canonical custom metadata {} for {}", self.custom, self.tag),
            ));
        }
        Ok(())
    }

    /// Fails with [`Error::TypeMismatch`] unless the header declares `expected`.
    pub fn expect(&self, expected: TypeTag) -> Result<()> {
        if self.tag == expected {
            Ok(())
        } else {
            Err(Error::type_mismatch(
                self.offset,
                expected.name(),
                self.tag.name(),
            ))
        }
    }

    fn describe(&self) -> String {
        if self.null {
            format!("null {}", self.tag)
        } else {
            self.tag.to_string()
        }
    }
}

/// Packs a sign and a magnitude byte count: bit 0 set for non-negative.
#[inline]
#[must_use]
pub fn pack_signed_count(non_negative: bool, byte_count: u64) -> u64 {
    (byte_count << 1) | u64::from(non_negative)
}

/// Inverse of [`pack_signed_count`].
#[inline]
#[must_use]
pub fn unpack_signed_count(custom: u64) -> (bool, u64) {
    (custom & 1 == 1, custom >> 1)
}

/// Packs decimal metadata: bit 0 significand sign, bit 1 scale sign, rest byte count.
#[inline]
#[must_use]
pub fn pack_decimal(significand_non_negative: bool, scale_non_negative: bool, byte_count: u64) -> u64 {
    (byte_count << 2) | (u64::from(scale_non_negative) << 1) | u64::from(significand_non_negative)
}

/// Inverse of [`pack_decimal`]: `(significand sign, scale sign, byte count)`.
#[inline]
#[must_use]
pub fn unpack_decimal(custom: u64) -> (bool, bool, u64) {
    (custom & 1 == 1, custom & 2 == 2, custom >> 2)
}
