//! Byte cursor and writer used by all transcoders
//!
//! [`ByteCursor`] gives sequential read access over a borrowed buffer with an
//! explicit position. Every access is bounds checked and fails with
//! [`QrDataError::StructuralDecode`] instead of truncating silently.
//!
//! [`ByteWriter`] accumulates encoded output in a `BytesMut` buffer.

use crate::error::{QrDataError, QrDataResult};
use bytes::{BufMut, BytesMut};

/// Sequential reader over a byte slice
///
/// # Position Tracking
///
/// The cursor maintains a position that advances on `read_*` calls. `peek`
/// returns bytes without advancing, so a caller can look at a value before
/// deciding how to consume it.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor positioned at the start of `buffer`
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to read
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Read a byte, advancing the position
    pub fn read_byte(&mut self) -> QrDataResult<u8> {
        if self.position >= self.buffer.len() {
            return Err(QrDataError::StructuralDecode(format!(
                "Buffer exhausted while reading byte at position {}",
                self.position
            )));
        }
        let byte = self.buffer[self.position];
        self.position += 1;
        Ok(byte)
    }

    /// Read `count` bytes, advancing the position
    pub fn read_bytes(&mut self, count: usize) -> QrDataResult<&'a [u8]> {
        let bytes = self.peek(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Return the next `count` bytes without advancing
    pub fn peek(&self, count: usize) -> QrDataResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(QrDataError::StructuralDecode(format!(
                "Buffer exhausted at position {}: need {} bytes, have {}",
                self.position,
                count,
                self.remaining()
            )));
        }
        Ok(&self.buffer[self.position..self.position + count])
    }

    /// Move the position by `offset` bytes (may be negative)
    pub fn seek_by(&mut self, offset: isize) -> QrDataResult<()> {
        let target = self.position.checked_add_signed(offset).ok_or_else(|| {
            QrDataError::StructuralDecode(format!(
                "Cannot seek by {} from position {}",
                offset, self.position
            ))
        })?;
        self.seek_to(target)
    }

    /// Move the position to an absolute offset. The end of the buffer is a valid target.
    pub fn seek_to(&mut self, position: usize) -> QrDataResult<()> {
        if position > self.buffer.len() {
            return Err(QrDataError::StructuralDecode(format!(
                "Seek target {} beyond buffer length {}",
                position,
                self.buffer.len()
            )));
        }
        self.position = position;
        Ok(())
    }

    /// Read a big-endian unsigned integer of `width` bytes (0-8)
    pub fn read_uint(&mut self, width: usize) -> QrDataResult<u64> {
        if width > 8 {
            return Err(QrDataError::StructuralDecode(format!(
                "Integer too large: {} bytes (max 8)",
                width
            )));
        }
        let bytes = self.read_bytes(width)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }
}

/// Growable output buffer for encoders
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buffer.put_u8(byte);
    }

    /// Write `value` as a big-endian integer of exactly `width` bytes
    ///
    /// # Error Handling
    /// Returns error if `width` exceeds 8 or `value` does not fit.
    pub fn write_uint(&mut self, value: u64, width: usize) -> QrDataResult<()> {
        if width > 8 {
            return Err(QrDataError::EncodingConstraint(format!(
                "Integer width {} exceeds 8 bytes",
                width
            )));
        }
        if width < 8 && value >> (width * 8) != 0 {
            return Err(QrDataError::EncodingConstraint(format!(
                "Value {} does not fit into {} bytes",
                value, width
            )));
        }
        self.buffer.put_uint(value, width);
        Ok(())
    }

    /// Write `value` using the fewest big-endian bytes; zero is written as one byte
    pub fn write_uint_minimal(&mut self, value: u64) {
        self.buffer.put_slice(&minimal_be_bytes(value));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.to_vec()
    }
}

/// Minimal big-endian representation of an unsigned integer
pub fn minimal_be_bytes(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    bytes[skip..].to_vec()
}
