//! Byte stream boundary.
//!
//! [`ByteReader`] and [`ByteWriter`] wrap any [`Read`]/[`Write`] and count the
//! bytes that pass through them, so every decode error can name the offset
//! where it happened. Reads are strictly sequential; nothing seeks.

use crate::{varint, Error, Result};
use std::io::{Read, Write};

/// Sequential reader with offset tracking.
pub struct ByteReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        ByteReader { inner, offset: 0 }
    }

    /// Number of bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// One `read_exact` call per byte; unbuffered sources pay a syscall each.
    pub fn read_u8(&mut self, context: &str) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.inner
            .read_exact(&mut byte)
            .map_err(|e| Error::from_io(&e, self.offset, context))?;
        self.offset += 1;
        Ok(byte[0])
    }

    /// Reads exactly `len` bytes.
    ///
    /// The buffer grows with the data actually received, so a header that
    /// lies about its length cannot force a large up-front allocation.
    pub fn read_bytes(&mut self, len: usize, context: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(8 * 1024));
        let read = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(|e| Error::from_io(&e, self.offset, context))?;
        self.offset += read as u64;
        if read < len {
            return Err(Error::truncated(self.offset, context));
        }
        Ok(buf)
    }

    /// Reads a varint length and checks it against `limit`.
    pub fn read_length(&mut self, limit: u64, context: &str) -> Result<usize> {
        let declared = varint::read_u64(self, context)?;
        check_length(declared, limit)
    }

    /// Returns `true` if the underlying stream has no more bytes.
    ///
    /// Consumes one byte when the stream is not exhausted.
    pub fn is_exhausted(&mut self) -> Result<bool> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(true),
                Ok(_) => return Ok(false),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(&e.to_string())),
            }
        }
    }
}

/// Converts a declared length to `usize`, enforcing `limit`.
pub(crate) fn check_length(declared: u64, limit: u64) -> Result<usize> {
    if declared > limit {
        return Err(Error::LengthLimitExceeded { declared, limit });
    }
    usize::try_from(declared).map_err(|_| Error::LengthLimitExceeded {
        declared,
        limit: usize::MAX as u64,
    })
}

/// Sequential writer with a byte counter.
pub struct ByteWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> ByteWriter<W> {
    pub fn new(inner: W) -> Self {
        ByteWriter { inner, written: 0 }
    }

    #[inline]
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<()> {
        self.write_all(&[byte])
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner
            .write_all(bytes)
            .map_err(|e| Error::io(&e.to_string()))?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|e| Error::io(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_advance() {
        let data = [1u8, 2, 3, 4];
        let mut reader = ByteReader::new(&data[..]);
        assert_eq!(reader.read_u8("first").unwrap(), 1);
        assert_eq!(reader.read_bytes(2, "pair").unwrap(), vec![2, 3]);
        assert_eq!(reader.offset(), 3);
        assert!(!reader.is_exhausted().unwrap());
        assert!(reader.is_exhausted().unwrap());
    }

    #[test]
    fn test_short_read_is_truncation() {
        let data = [1u8, 2];
        let mut reader = ByteReader::new(&data[..]);
        let err = reader.read_bytes(5, "body").unwrap_err();
        match err {
            Error::Truncated { offset, context } => {
                assert_eq!(offset, 2);
                assert_eq!(context, "body");
            }
            other => panic!("expected truncation, got {:?}", other),
        }

        let mut empty = ByteReader::new(&[][..]);
        assert!(empty.read_u8("header").unwrap_err().is_truncation());
    }

    #[test]
    fn test_length_limit() {
        assert_eq!(check_length(10, 10).unwrap(), 10);
        assert!(matches!(
            check_length(11, 10),
            Err(Error::LengthLimitExceeded {
                declared: 11,
                limit: 10
            })
        ));
    }

    #[test]
    fn test_writer_counts_bytes() {
        let mut writer = ByteWriter::new(Vec::new());
        writer.write_u8(7).unwrap();
        writer.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(writer.into_inner(), vec![7, 1, 2, 3]);
    }
}
