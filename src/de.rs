//! Binary deserialization.
//!
//! [`Deserializer`] reads values strictly left to right. Containers are
//! registered in the address arena as soon as their header is read and
//! before any child, so a child that refers back to an enclosing container
//! (a cycle) resolves to the very instance being filled. Strings and symbols
//! are registered once their content is complete; value kinds are never
//! registered.
//!
//! ```rust
//! use binval::{from_slice, Value};
//!
//! // a sequence holding itself
//! let value = from_slice(&[0x89, 0x01, 0x0b]).unwrap();
//! let seq = value.as_sequence().unwrap();
//! assert!(seq.get(0).unwrap().ptr_eq(&value));
//! seq.clear();
//! ```

use crate::attribute::read_text;
use crate::metadata::{TypeMetadata, TypeTag};
use crate::scalar;
use crate::stream::{check_length, ByteReader};
use crate::tracker::ReadTracker;
use crate::{
    AttributeSet, CodecOptions, Error, PropertyName, RecordValue, Result, SequenceValue, Value,
};
use std::io::Read;

/// The binary deserializer.
pub struct Deserializer<R> {
    reader: ByteReader<R>,
    options: CodecOptions,
    tracker: ReadTracker,
    depth: usize,
}

impl<R: Read> Deserializer<R> {
    /// Creates a deserializer with default limits.
    ///
    /// The reader is asked for one byte per header, so pass a buffered
    /// reader when the source is a file or socket:
    ///
    /// ```rust,no_run
    /// use binval::Deserializer;
    /// use std::fs::File;
    /// use std::io::BufReader;
    ///
    /// let file = File::open("values.bin")?;
    /// let mut deserializer = Deserializer::new(BufReader::new(file));
    /// let value = deserializer.read_value()?;
    /// # let _ = value;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, CodecOptions::default())
    }

    pub fn with_options(reader: R, options: CodecOptions) -> Self {
        Deserializer {
            reader: ByteReader::new(reader),
            options,
            tracker: ReadTracker::new(),
            depth: 0,
        }
    }

    /// Reads one root value.
    ///
    /// May be called repeatedly on a stream of roots; addresses assigned by
    /// earlier roots stay resolvable.
    ///
    /// # Errors
    ///
    /// Any decoding error: truncation, unknown tags, malformed metadata,
    /// dangling references, or a configured limit being exceeded.
    pub fn read_value(&mut self) -> Result<Value> {
        let start = self.reader.offset();
        self.depth = 0;
        let value = self.read()?;
        log::debug!(
            "decoded {} root from {} bytes, {} addresses registered",
            value.kind(),
            self.reader.offset() - start,
            self.tracker.len()
        );
        Ok(value)
    }

    /// Fails with [`Error::TrailingBytes`] unless the input is exhausted.
    pub fn end(&mut self) -> Result<()> {
        let offset = self.reader.offset();
        if self.reader.is_exhausted()? {
            Ok(())
        } else {
            Err(Error::TrailingBytes { offset })
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.reader.offset()
    }

    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }

    fn read(&mut self) -> Result<Value> {
        let meta = TypeMetadata::read_from(&mut self.reader)?;
        if meta.tag == TypeTag::Reference {
            let value = self.tracker.resolve(meta.custom, meta.offset)?;
            log::trace!("resolved reference to address {} ({})", meta.custom, value.kind());
            return Ok(value);
        }

        let max_length = self.options.max_length;
        let attributes = if meta.annotated {
            AttributeSet::read_from(&mut self.reader, max_length)?
        } else {
            AttributeSet::new()
        };

        let reader = &mut self.reader;
        let value = match meta.tag {
            TypeTag::Boolean => Value::Boolean(scalar::read_boolean(&meta, attributes)?),
            TypeTag::Integer => {
                Value::Integer(scalar::read_integer(reader, &meta, attributes, max_length)?)
            }
            TypeTag::Decimal => {
                Value::Decimal(scalar::read_decimal(reader, &meta, attributes, max_length)?)
            }
            TypeTag::Duration => {
                Value::Duration(scalar::read_duration(reader, &meta, attributes, max_length)?)
            }
            TypeTag::Timestamp => {
                Value::Timestamp(scalar::read_timestamp(reader, &meta, attributes, max_length)?)
            }
            TypeTag::Blob => Value::Blob(scalar::read_blob(reader, &meta, attributes, max_length)?),
            TypeTag::String => {
                let value =
                    Value::String(scalar::read_string(reader, &meta, attributes, max_length)?);
                self.register(&value);
                value
            }
            TypeTag::Symbol => {
                let value =
                    Value::Symbol(scalar::read_symbol(reader, &meta, attributes, max_length)?);
                self.register(&value);
                value
            }
            TypeTag::Sequence => self.nested(|de| de.read_sequence(&meta, attributes))?,
            TypeTag::Record => self.nested(|de| de.read_record(&meta, attributes))?,
            TypeTag::Reference => {
                return Err(Error::invalid_metadata(meta.offset, "misplaced reference"))
            }
        };
        Ok(value)
    }

    fn register(&mut self, value: &Value) {
        let address = self.tracker.register(value.clone());
        log::trace!("{} registered at address {}", value.kind(), address);
    }

    fn nested<F>(&mut self, f: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
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

    fn read_sequence(&mut self, meta: &TypeMetadata, attributes: AttributeSet) -> Result<Value> {
        let sequence = if meta.null {
            SequenceValue::null()
        } else {
            SequenceValue::empty()
        }
        .with_attributes(attributes);
        let value = Value::Sequence(sequence.clone());
        self.register(&value);
        if meta.null {
            return Ok(value);
        }

        let count = check_length(meta.custom, self.options.max_length)?;
        for _ in 0..count {
            // the child is complete before the sequence is borrowed for the push
            let item = self.read()?;
            sequence.push(item);
        }
        Ok(value)
    }

    fn read_record(&mut self, meta: &TypeMetadata, attributes: AttributeSet) -> Result<Value> {
        let record = if meta.null {
            RecordValue::null()
        } else {
            RecordValue::empty()
        }
        .with_attributes(attributes);
        let value = Value::Record(record.clone());
        self.register(&value);
        if meta.null {
            return Ok(value);
        }

        let max_length = self.options.max_length;
        let count = check_length(meta.custom, max_length)?;
        for _ in 0..count {
            let name = read_text(&mut self.reader, max_length, "property name")?;
            let name_attributes = AttributeSet::read_from(&mut self.reader, max_length)?;
            let item = self.read()?;
            record.set(PropertyName::new(name).with_attributes(name_attributes), item);
        }
        Ok(value)
    }
}
