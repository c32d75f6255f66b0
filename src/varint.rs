//! Variable-length unsigned integers.
//!
//! Seven payload bits per byte, least-significant group first; the high bit
//! of a byte is set when more bytes follow. This is the only primitive that
//! carries unbounded quantities (counts, lengths, magnitude byte-counts,
//! decimal scales, reference addresses) inside the fixed-size header.
//!
//! ```text
//! 0        -> 00
//! 127      -> 7f
//! 128      -> 80 01
//! 300      -> ac 02
//! ```
//!
//! The codec itself only needs the `u64` forms. [`encode_biguint`],
//! [`write_biguint`] and [`read_biguint`] are public helpers for callers that
//! frame their own unbounded quantities in the same layout; a value below
//! 2^64 encodes to the same bytes either way.

use crate::stream::{ByteReader, ByteWriter};
use crate::{Error, Result};
use num_bigint::BigUint;
use std::io::{Read, Write};

const PAYLOAD_MASK: u8 = 0x7f;
const CONTINUATION: u8 = 0x80;

/// Number of bytes `value` occupies when encoded.
///
/// # Examples
///
/// ```rust
/// use binval::varint::encoded_len;
///
/// assert_eq!(encoded_len(0), 1);
/// assert_eq!(encoded_len(127), 1);
/// assert_eq!(encoded_len(128), 2);
/// assert_eq!(encoded_len(u64::MAX), 10);
/// ```
#[must_use]
pub const fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        (bits + 6) / 7
    }
}

/// Appends the encoding of `value` to `out`.
pub fn encode_u64(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION);
    }
}

pub fn write_u64<W: Write>(writer: &mut ByteWriter<W>, value: u64) -> Result<()> {
    let mut buf = Vec::with_capacity(encoded_len(value));
    encode_u64(value, &mut buf);
    writer.write_all(&buf)
}

/// Reads a varint that must fit in 64 bits.
///
/// # Errors
///
/// [`Error::Truncated`] if the stream ends before a terminating byte,
/// [`Error::VarintOverflow`] if the value needs more than 64 bits.
pub fn read_u64<R: Read>(reader: &mut ByteReader<R>, context: &str) -> Result<u64> {
    let start = reader.offset();
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = reader.read_u8(context)?;
        let payload = byte & PAYLOAD_MASK;
        if shift > 63 || (shift == 63 && payload > 1) {
            return Err(Error::VarintOverflow { offset: start });
        }
        result |= u64::from(payload) << shift;
        if byte & CONTINUATION == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

/// Appends the encoding of an unbounded `value` to `out`.
///
/// # Examples
///
/// ```rust
/// use binval::varint::encode_biguint;
/// use num_bigint::BigUint;
///
/// let mut out = Vec::new();
/// encode_biguint(&BigUint::from(1u128 << 70), &mut out);
/// assert_eq!(out, vec![0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
/// ```
pub fn encode_biguint(value: &BigUint, out: &mut Vec<u8>) {
    // base-128 digits are exactly the 7-bit groups, least significant first
    let digits = value.to_radix_le(128);
    let last = digits.len() - 1;
    for (i, digit) in digits.into_iter().enumerate() {
        out.push(if i < last { digit | CONTINUATION } else { digit });
    }
}

pub fn write_biguint<W: Write>(writer: &mut ByteWriter<W>, value: &BigUint) -> Result<()> {
    let mut buf = Vec::new();
    encode_biguint(value, &mut buf);
    writer.write_all(&buf)
}

/// Reads a varint of unbounded magnitude.
///
/// `max_bytes` bounds how many continuation bytes are accepted so a stream
/// of `0x80` bytes cannot grow the result forever.
pub fn read_biguint<R: Read>(
    reader: &mut ByteReader<R>,
    max_bytes: u64,
    context: &str,
) -> Result<BigUint> {
    let mut digits = Vec::new();
    loop {
        if digits.len() as u64 >= max_bytes {
            return Err(Error::LengthLimitExceeded {
                declared: digits.len() as u64 + 1,
                limit: max_bytes,
            });
        }
        let byte = reader.read_u8(context)?;
        digits.push(byte & PAYLOAD_MASK);
        if byte & CONTINUATION == 0 {
            break;
        }
    }
    BigUint::from_radix_le(&digits, 128)
        .ok_or_else(|| Error::custom("varint digit out of range"))
}
