//! Binary serialization.
//!
//! [`Serializer`] walks a value graph depth-first and writes each node as
//! `[header][attributes][body]`. Before a reference-kind instance is written
//! it is offered to the pass's [`WriteTracker`]: the first sighting assigns
//! it an address and writes it in full, every later sighting writes only a
//! Reference header carrying that address. This is what lets aliased and
//! cyclic graphs be written in finite space.
//!
//! ## Usage
//!
//! Most users should use the functions in the crate root:
//!
//! ```rust
//! use binval::{to_vec, Value};
//!
//! let bytes = to_vec(&Value::from(vec![Value::from(1), Value::from(2)])).unwrap();
//! assert_eq!(bytes, vec![0x89, 0x02, 0x82, 0x03, 0x01, 0x82, 0x03, 0x02]);
//! ```
//!
//! ## Direct Serializer Usage
//!
//! A single serializer can write several root values to one stream. The
//! address table is shared between them, so an instance written by an
//! earlier root is referenced, not repeated, by a later one.
//!
//! ```rust
//! use binval::{Deserializer, Serializer, Value};
//!
//! let shared = Value::from("shared");
//! let mut serializer = Serializer::new(Vec::new());
//! serializer.write_value(&shared).unwrap();
//! serializer.write_value(&shared).unwrap();
//! let bytes = serializer.into_inner();
//!
//! let mut deserializer = Deserializer::new(&bytes[..]);
//! let first = deserializer.read_value().unwrap();
//! let second = deserializer.read_value().unwrap();
//! assert!(first.ptr_eq(&second));
//! ```

use crate::attribute::write_text;
use crate::metadata::{TypeMetadata, TypeTag};
use crate::scalar::{self, write_header};
use crate::stream::ByteWriter;
use crate::tracker::{Tracked, WriteTracker};
use crate::{CodecOptions, Error, RecordValue, Result, SequenceValue, Value};
use std::io::Write;

/// The binary serializer.
///
/// Holds the output stream, the address table and the current nesting
/// depth. Not `Send`: the values it retains are `Rc` based.
pub struct Serializer<W> {
    writer: ByteWriter<W>,
    options: CodecOptions,
    tracker: WriteTracker,
    depth: usize,
}

impl<W: Write> Serializer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, CodecOptions::default())
    }

    pub fn with_options(writer: W, options: CodecOptions) -> Self {
        Serializer {
            writer: ByteWriter::new(writer),
            options,
            tracker: WriteTracker::new(),
            depth: 0,
        }
    }

    /// Writes one root value.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the underlying writer fails and
    /// [`Error::DepthLimitExceeded`] if containers nest deeper than
    /// [`CodecOptions::max_depth`]. On error the stream holds a partial value.
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        let start = self.writer.bytes_written();
        self.depth = 0;
        self.write(value)?;
        log::debug!(
            "encoded {} root in {} bytes, {} addresses assigned",
            value.kind(),
            self.writer.bytes_written() - start,
            self.tracker.len()
        );
        Ok(())
    }

    /// Total bytes written so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.writer.bytes_written()
    }

    /// Number of reference-kind instances assigned an address so far.
    #[must_use]
    pub fn addresses_assigned(&self) -> usize {
        self.tracker.len()
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, value: &Value) -> Result<()> {
        match self.tracker.track(value) {
            Some(Tracked::Existing(address)) => {
                log::trace!("{} already at address {}, writing reference", value.kind(), address);
                return TypeMetadata::new(TypeTag::Reference)
                    .custom(address)
                    .write_to(&mut self.writer);
            }
            Some(Tracked::New(address)) => {
                log::trace!("{} assigned address {}", value.kind(), address);
            }
            None => {}
        }

        let writer = &mut self.writer;
        match value {
            Value::Boolean(v) => scalar::write_boolean(writer, v),
            Value::Integer(v) => scalar::write_integer(writer, v),
            Value::Decimal(v) => scalar::write_decimal(writer, v),
            Value::Duration(v) => scalar::write_duration(writer, v),
            Value::Timestamp(v) => scalar::write_timestamp(writer, v),
            Value::String(v) => scalar::write_string(writer, v),
            Value::Symbol(v) => scalar::write_symbol(writer, v),
            Value::Blob(v) => scalar::write_blob(writer, v),
            Value::Sequence(v) => self.nested(|ser| ser.write_sequence(v)),
            Value::Record(v) => self.nested(|ser| ser.write_record(v)),
        }
    }

    fn nested<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.depth >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn write_sequence(&mut self, sequence: &SequenceValue) -> Result<()> {
        let cell = sequence.cell();
        let Some(items) = &cell.items else {
            let meta = TypeMetadata::new(TypeTag::Sequence).null(true);
            return write_header(&mut self.writer, meta, &cell.attributes);
        };

        let meta = TypeMetadata::new(TypeTag::Sequence).custom(items.len() as u64);
        write_header(&mut self.writer, meta, &cell.attributes)?;
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    fn write_record(&mut self, record: &RecordValue) -> Result<()> {
        let cell = record.cell();
        let Some(properties) = &cell.properties else {
            let meta = TypeMetadata::new(TypeTag::Record).null(true);
            return write_header(&mut self.writer, meta, &cell.attributes);
        };

        let meta = TypeMetadata::new(TypeTag::Record).custom(properties.len() as u64);
        write_header(&mut self.writer, meta, &cell.attributes)?;
        for (name, value) in properties.iter() {
            write_text(&mut self.writer, name.as_str())?;
            name.attributes().write_to(&mut self.writer)?;
            self.write(value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeSet, StringValue, ValueKind};

    fn encode(value: &Value) -> Vec<u8> {
        let mut ser = Serializer::new(Vec::new());
        ser.write_value(value).unwrap();
        ser.into_inner()
    }

    #[test]
    fn test_empty_containers_are_one_byte() {
        assert_eq!(encode(&Value::from(Vec::<Value>::new())), vec![0x09]);
        assert_eq!(encode(&Value::Record(RecordValue::empty())), vec![0x0a]);
        assert_eq!(encode(&Value::null(ValueKind::Record)), vec![0x1a]);
    }

    #[test]
    fn test_record_layout() {
        let name = crate::map::PropertyName::new("k")
            .with_attributes(AttributeSet::from_pairs([("i", None)]).unwrap());
        let record = RecordValue::empty();
        record.set(name, Value::from(true));
        assert_eq!(
            encode(&Value::Record(record)),
            vec![
                0x8a, 0x01, // record, one property
                0x01, b'k', // name
                0x01, 0x01, b'i', 0x00, // name attributes
                0x41, // true
            ]
        );
    }

    #[test]
    fn test_alias_written_once() {
        let s = Value::from("ab");
        let seq = Value::from(vec![s.clone(), s]);
        assert_eq!(
            encode(&seq),
            vec![0x89, 0x02, 0x86, 0x02, b'a', 0, b'b', 0, 0x8b, 0x01]
        );
    }

    #[test]
    fn test_self_reference_points_at_address_zero() {
        let seq = SequenceValue::empty();
        seq.push(Value::Sequence(seq.clone()));
        // a reference to address 0 has no continuation byte
        assert_eq!(encode(&Value::Sequence(seq.clone())), vec![0x89, 0x01, 0x0b]);
        seq.clear();
    }

    #[test]
    fn test_null_string_is_tracked() {
        let null = Value::String(StringValue::null());
        let seq = Value::from(vec![null.clone(), null]);
        assert_eq!(encode(&seq), vec![0x89, 0x02, 0x16, 0x8b, 0x01]);
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::from(Vec::<Value>::new());
        for _ in 0..4 {
            value = Value::from(vec![value]);
        }
        let options = CodecOptions::new().with_max_depth(4);
        let mut ser = Serializer::with_options(Vec::new(), options);
        let err = ser.write_value(&value).unwrap_err();
        assert!(matches!(err, Error::DepthLimitExceeded { limit: 4 }));

        let mut ser = Serializer::with_options(Vec::new(), CodecOptions::new().with_max_depth(5));
        assert!(ser.write_value(&value).is_ok());
    }
}
