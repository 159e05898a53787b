//! Byte cursor over an in-memory buffer.

use alloc::vec::Vec;
use bytes::{Buf, BufMut};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Error, Result};

/// Sequential big-endian reader over a borrowed byte slice.
///
/// Every read is checked: running out of input yields [`Error::Underflow`]
/// and leaves the cursor where it was.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.input.remaining()
    }

    /// Has all input been consumed?
    pub fn is_empty(&self) -> bool {
        !self.input.has_remaining()
    }

    /// The unread part of the input.
    pub fn remaining_slice(&self) -> &'a [u8] {
        self.input
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(&self) -> Result<u8> {
        self.input.first().copied().ok_or(Error::Underflow)
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let value = self.input.try_get_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = self.input.try_get_u16()?;
        self.position += 2;
        Ok(value)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.input.try_get_u32()?;
        self.position += 4;
        Ok(value)
    }

    /// Borrow the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.input.remaining() < len {
            return Err(Error::Underflow);
        }
        let (head, tail) = self.input.split_at(len);
        self.input = tail;
        self.position += len;
        Ok(head)
    }

    /// Skip over `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        if self.input.remaining() < len {
            return Err(Error::Underflow);
        }
        self.input.advance(len);
        self.position += len;
        Ok(())
    }

    /// Split off the next `len` bytes as an independent reader.
    pub fn sub_reader(&mut self, len: usize) -> Result<Reader<'a>> {
        self.read_bytes(len).map(Reader::new)
    }

    /// Fail with [`Error::BadData`] unless all input has been consumed.
    pub fn finish(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::BadData)
        }
    }
}

/// Growable big-endian writer with an optional size limit.
///
/// The buffer is wiped when the writer is dropped, so it can hold private
/// key components.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl Writer {
    /// Create an unbounded writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer that fails with [`Error::Overflow`] once more than
    /// `limit` bytes would be written.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(limit),
            limit: Some(limit),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Has nothing been written yet?
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    fn reserve(&mut self, len: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            let total = self.buf.len().checked_add(len).ok_or(Error::Overflow)?;
            if total > limit {
                return Err(Error::Overflow);
            }
        }
        Ok(())
    }

    /// Write a single byte.
    pub fn write_byte(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?;
        self.buf.put_u8(value);
        Ok(())
    }

    /// Write a big-endian `u16`.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.reserve(2)?;
        self.buf.put_u16(value);
        Ok(())
    }

    /// Write a big-endian `u32`.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(4)?;
        self.buf.put_u32(value);
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.reserve(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Take the written bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        core::mem::take(&mut self.buf)
    }

    /// Take the written bytes in a buffer that is wiped on drop.
    pub fn into_secret(self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(self.into_vec())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}
