//! BER definite length
//!
//! Short form: one byte, top bit clear, lengths 0-127.
//! Long form: `0x80 | n` followed by `n` big-endian length bytes, `n <= 3`.

use qrdata_core::{ByteCursor, ByteWriter, QrDataError, QrDataResult, minimal_be_bytes};

/// Largest length the long form can carry with three length bytes
pub const MAX_LENGTH: usize = 0xFF_FFFF;

/// Maximum number of bytes following the long-form marker
const MAX_LENGTH_BYTES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length carried in 1-3 following bytes
    Long(usize),
}

impl BerLength {
    /// Choose the minimal form for `length`
    pub fn new(length: usize) -> QrDataResult<Self> {
        if length > MAX_LENGTH {
            return Err(QrDataError::EncodingConstraint(format!(
                "TLV length must be at most 0x{:06X}. Is: {}",
                MAX_LENGTH, length
            )));
        }
        if length < 0x80 {
            Ok(BerLength::Short(length as u8))
        } else {
            Ok(BerLength::Long(length))
        }
    }

    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        match self {
            BerLength::Short(_) => 1,
            BerLength::Long(l) => 1 + minimal_be_bytes(*l as u64).len(),
        }
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        match self {
            BerLength::Short(length) => writer.write_byte(*length),
            BerLength::Long(length) => {
                let bytes = minimal_be_bytes(*length as u64);
                writer.write_byte(0x80 | bytes.len() as u8);
                writer.write(&bytes);
            }
        }
    }

    /// Read a length at the cursor position
    ///
    /// # Error Handling
    /// Returns [`QrDataError::StructuralDecode`] if more than three length
    /// bytes are announced or the buffer ends inside the length.
    pub fn decode(cursor: &mut ByteCursor<'_>) -> QrDataResult<Self> {
        let position = cursor.position();
        let first = cursor.read_byte()?;

        if first & 0x80 == 0 {
            return Ok(BerLength::Short(first));
        }

        let count = (first & 0x7F) as usize;
        if count > MAX_LENGTH_BYTES {
            return Err(QrDataError::StructuralDecode(format!(
                "Number of bytes for TLV length too big at position {}. Support up to {}. Is: {}",
                position, MAX_LENGTH_BYTES, count
            )));
        }
        if count > cursor.remaining() {
            return Err(QrDataError::StructuralDecode(format!(
                "Byte array too short for length encoding at position {}: need {} bytes, have {}",
                position,
                count,
                cursor.remaining()
            )));
        }

        let length = cursor.read_uint(count)? as usize;
        Ok(BerLength::Long(length))
    }
}
