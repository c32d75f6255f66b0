//! Scalar payload codecs.
//!
//! One writer and one reader per scalar kind. A writer emits the whole framed
//! value (header, attributes, body). A reader is handed a header that has
//! already been parsed together with its attribute set and consumes exactly
//! the body that header declares; for null, zero, empty and booleans that is
//! nothing at all.
//!
//! Integers, durations and timestamps share one body layout: the sign lives
//! in bit 0 of the custom metadata and the body is the unsigned magnitude,
//! little-endian, in the minimal number of bytes.

use crate::metadata::{self, TypeMetadata, TypeTag};
use crate::stream::{check_length, ByteReader, ByteWriter};
use crate::text::{StringValue, SymbolValue};
use crate::value::{
    BlobValue, BooleanValue, DecimalValue, DurationValue, IntegerValue, Scalar, TimestampValue,
};
use crate::{varint, AttributeSet, Decimal, Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::{BigInt, Sign};
use std::io::{Read, Write};

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Writes a header, followed by the attribute set when it is not empty.
pub fn write_header<W: Write>(
    writer: &mut ByteWriter<W>,
    meta: TypeMetadata,
    attributes: &AttributeSet,
) -> Result<()> {
    let annotated = !attributes.is_empty();
    meta.annotated(annotated).write_to(writer)?;
    if annotated {
        attributes.write_to(writer)?;
    }
    Ok(())
}

pub fn write_boolean<W: Write>(writer: &mut ByteWriter<W>, value: &BooleanValue) -> Result<()> {
    let meta = TypeMetadata::new(TypeTag::Boolean)
        .null(value.is_null())
        .custom_flag(value.value() == Some(&true));
    write_header(writer, meta, value.attributes())
}

pub fn read_boolean(meta: &TypeMetadata, attributes: AttributeSet) -> Result<BooleanValue> {
    meta.expect(TypeTag::Boolean)?;
    let value = (!meta.null).then_some(meta.custom_flag);
    Ok(Scalar::from_parts(value, attributes))
}

pub fn write_integer<W: Write>(writer: &mut ByteWriter<W>, value: &IntegerValue) -> Result<()> {
    write_signed(writer, TypeTag::Integer, value.value(), value.attributes())
}

pub fn read_integer<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<IntegerValue> {
    meta.expect(TypeTag::Integer)?;
    let value = read_signed(reader, meta, max_length, "integer magnitude")?;
    Ok(Scalar::from_parts(value, attributes))
}

pub fn write_decimal<W: Write>(writer: &mut ByteWriter<W>, value: &DecimalValue) -> Result<()> {
    let attributes = value.attributes();
    let decimal = match value.value() {
        None => return write_header(writer, null_header(TypeTag::Decimal), attributes),
        Some(d) if d.is_zero() => {
            return write_header(writer, TypeMetadata::new(TypeTag::Decimal), attributes)
        }
        Some(d) => d,
    };

    let (sign, magnitude) = decimal.significand().to_bytes_le();
    let scale = decimal.scale();
    let custom = metadata::pack_decimal(sign != Sign::Minus, scale >= 0, magnitude.len() as u64);
    write_header(
        writer,
        TypeMetadata::new(TypeTag::Decimal).custom(custom),
        attributes,
    )?;
    varint::write_u64(writer, scale.unsigned_abs())?;
    writer.write_all(&magnitude)
}

pub fn read_decimal<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<DecimalValue> {
    meta.expect(TypeTag::Decimal)?;
    if meta.null {
        return Ok(Scalar::from_parts(None, attributes));
    }
    if meta.custom == 0 {
        return Ok(Scalar::from_parts(Some(Decimal::zero()), attributes));
    }

    let (significand_non_negative, scale_non_negative, count) =
        metadata::unpack_decimal(meta.custom);
    let scale_offset = reader.offset();
    let scale_magnitude = varint::read_u64(reader, "decimal scale")?;
    let scale = if scale_non_negative {
        i64::try_from(scale_magnitude).ok()
    } else {
        0i64.checked_sub_unsigned(scale_magnitude)
    }
    .ok_or_else(|| {
        Error::out_of_range(format!(
            "decimal scale magnitude {} at offset {}",
            scale_magnitude, scale_offset
        ))
    })?;

    let len = check_length(count, max_length)?;
    let bytes = reader.read_bytes(len, "decimal significand")?;
    let sign = if significand_non_negative {
        Sign::Plus
    } else {
        Sign::Minus
    };
    let decimal = Decimal::new(BigInt::from_bytes_le(sign, &bytes), scale);
    Ok(Scalar::from_parts(Some(decimal), attributes))
}

pub fn write_duration<W: Write>(writer: &mut ByteWriter<W>, value: &DurationValue) -> Result<()> {
    let nanos = value.value().map(|d| BigInt::from(duration_nanos(d)));
    write_signed(writer, TypeTag::Duration, nanos.as_ref(), value.attributes())
}

pub fn read_duration<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<DurationValue> {
    meta.expect(TypeTag::Duration)?;
    let value = read_signed(reader, meta, max_length, "duration magnitude")?
        .map(|nanos| {
            let (secs, subsec) = split_nanos(&nanos, "duration")?;
            TimeDelta::new(secs, subsec)
                .ok_or_else(|| Error::out_of_range(format!("duration of {} ns", nanos)))
        })
        .transpose()?;
    Ok(Scalar::from_parts(value, attributes))
}

pub fn write_timestamp<W: Write>(
    writer: &mut ByteWriter<W>,
    value: &TimestampValue,
) -> Result<()> {
    let nanos = value
        .value()
        .map(|ts| {
            let subsec = ts.timestamp_subsec_nanos();
            // chrono keeps a leap second as a sub-second part of 1e9 or more
            if i128::from(subsec) >= NANOS_PER_SECOND {
                return Err(Error::out_of_range(format!("leap second timestamp {}", ts)));
            }
            Ok(BigInt::from(
                i128::from(ts.timestamp()) * NANOS_PER_SECOND + i128::from(subsec),
            ))
        })
        .transpose()?;
    write_signed(writer, TypeTag::Timestamp, nanos.as_ref(), value.attributes())
}

pub fn read_timestamp<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<TimestampValue> {
    meta.expect(TypeTag::Timestamp)?;
    let value = read_signed(reader, meta, max_length, "timestamp magnitude")?
        .map(|nanos| {
            let (secs, subsec) = split_nanos(&nanos, "timestamp")?;
            DateTime::<Utc>::from_timestamp(secs, subsec)
                .ok_or_else(|| Error::out_of_range(format!("timestamp of {} ns", nanos)))
        })
        .transpose()?;
    Ok(Scalar::from_parts(value, attributes))
}

pub fn write_string<W: Write>(writer: &mut ByteWriter<W>, value: &StringValue) -> Result<()> {
    let attributes = value.attributes();
    let Some(units) = value.units() else {
        return write_header(writer, null_header(TypeTag::String), attributes);
    };
    let meta = TypeMetadata::new(TypeTag::String).custom(units.len() as u64);
    write_header(writer, meta, attributes)?;
    let body: Vec<u8> = units.iter().flat_map(|unit| unit.to_le_bytes()).collect();
    writer.write_all(&body)
}

pub fn read_string<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<StringValue> {
    meta.expect(TypeTag::String)?;
    if meta.null {
        return Ok(StringValue::null().with_attributes(attributes));
    }
    let count = check_length(meta.custom, max_length)?;
    let byte_len = count
        .checked_mul(2)
        .ok_or(Error::LengthLimitExceeded {
            declared: meta.custom,
            limit: max_length,
        })?;
    let bytes = reader.read_bytes(byte_len, "string body")?;
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    Ok(StringValue::from_utf16(units).with_attributes(attributes))
}

pub fn write_symbol<W: Write>(writer: &mut ByteWriter<W>, value: &SymbolValue) -> Result<()> {
    let attributes = value.attributes();
    let Some(bytes) = value.to_latin1() else {
        return write_header(writer, null_header(TypeTag::Symbol), attributes);
    };
    let meta = TypeMetadata::new(TypeTag::Symbol).custom(bytes.len() as u64);
    write_header(writer, meta, attributes)?;
    writer.write_all(&bytes)
}

pub fn read_symbol<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<SymbolValue> {
    meta.expect(TypeTag::Symbol)?;
    if meta.null {
        return Ok(SymbolValue::null().with_attributes(attributes));
    }
    let len = check_length(meta.custom, max_length)?;
    let bytes = reader.read_bytes(len, "symbol body")?;
    Ok(SymbolValue::from_latin1(&bytes).with_attributes(attributes))
}

pub fn write_blob<W: Write>(writer: &mut ByteWriter<W>, value: &BlobValue) -> Result<()> {
    let attributes = value.attributes();
    let Some(bytes) = value.value() else {
        return write_header(writer, null_header(TypeTag::Blob), attributes);
    };
    let meta = TypeMetadata::new(TypeTag::Blob).custom(bytes.len() as u64);
    write_header(writer, meta, attributes)?;
    writer.write_all(bytes)
}

pub fn read_blob<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    attributes: AttributeSet,
    max_length: u64,
) -> Result<BlobValue> {
    meta.expect(TypeTag::Blob)?;
    if meta.null {
        return Ok(Scalar::from_parts(None, attributes));
    }
    let len = check_length(meta.custom, max_length)?;
    let bytes = reader.read_bytes(len, "blob body")?;
    Ok(Scalar::from_parts(Some(bytes), attributes))
}

#[inline]
fn null_header(tag: TypeTag) -> TypeMetadata {
    TypeMetadata::new(tag).null(true)
}

fn write_signed<W: Write>(
    writer: &mut ByteWriter<W>,
    tag: TypeTag,
    value: Option<&BigInt>,
    attributes: &AttributeSet,
) -> Result<()> {
    let value = match value {
        None => return write_header(writer, null_header(tag), attributes),
        Some(v) if v.sign() == Sign::NoSign => {
            return write_header(writer, TypeMetadata::new(tag), attributes)
        }
        Some(v) => v,
    };
    let (sign, magnitude) = value.to_bytes_le();
    let custom = metadata::pack_signed_count(sign != Sign::Minus, magnitude.len() as u64);
    write_header(writer, TypeMetadata::new(tag).custom(custom), attributes)?;
    writer.write_all(&magnitude)
}

fn read_signed<R: Read>(
    reader: &mut ByteReader<R>,
    meta: &TypeMetadata,
    max_length: u64,
    context: &str,
) -> Result<Option<BigInt>> {
    if meta.null {
        return Ok(None);
    }
    let (non_negative, count) = metadata::unpack_signed_count(meta.custom);
    let len = check_length(count, max_length)?;
    let bytes = reader.read_bytes(len, context)?;
    let sign = if non_negative { Sign::Plus } else { Sign::Minus };
    Ok(Some(BigInt::from_bytes_le(sign, &bytes)))
}

fn duration_nanos(duration: &TimeDelta) -> i128 {
    // num_seconds and subsec_nanos share the sign of the duration
    i128::from(duration.num_seconds()) * NANOS_PER_SECOND + i128::from(duration.subsec_nanos())
}

/// Splits a nanosecond count into whole seconds and a non-negative remainder.
fn split_nanos(nanos: &BigInt, what: &str) -> Result<(i64, u32)> {
    let out_of_range = || Error::out_of_range(format!("{} of {} ns", what, nanos));
    let nanos = i128::try_from(nanos).map_err(|_| out_of_range())?;
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SECOND)).map_err(|_| out_of_range())?;
    // rem_euclid is always in 0..1e9
    let subsec = nanos.rem_euclid(NANOS_PER_SECOND) as u32;
    Ok((secs, subsec))
}
