//! Primitive decoder for hand-rolled little-endian bodies.
//!
//! Binary (non-protobuf) bodies are a flat run of fixed-width integers,
//! single-byte booleans, null-terminated strings, and raw byte runs. A
//! [`BinaryReader`] walks that run front to back. Every read either
//! returns a value and advances, or fails with
//! [`ProtocolError::Truncated`]. Short input never panics.
//!
//! Every read checks its length before consuming anything, so a failed
//! read leaves [`BinaryReader::position`] where it was.

use std::io::{self, Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::ProtocolError;

/// A forward-only cursor over a borrowed byte slice.
///
/// Borrowing (`&'a [u8]`) instead of owning means decoding never copies
/// the frame body; only the values we keep (strings, byte runs) are
/// allocated.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current offset from the start of the input.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    /// The unread tail of the input, without consuming it.
    pub fn rest(&self) -> &'a [u8] {
        let data: &'a [u8] = *self.cursor.get_ref();
        &data[self.position().min(data.len())..]
    }

    pub fn read_u8(&mut self) -> Result<u8, ProtocolError> {
        self.fixed(1, |c| c.read_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8, ProtocolError> {
        self.fixed(1, |c| c.read_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16, ProtocolError> {
        self.fixed(2, |c| c.read_u16::<LittleEndian>())
    }

    pub fn read_i16(&mut self) -> Result<i16, ProtocolError> {
        self.fixed(2, |c| c.read_i16::<LittleEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        self.fixed(4, |c| c.read_u32::<LittleEndian>())
    }

    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        self.fixed(4, |c| c.read_i32::<LittleEndian>())
    }

    pub fn read_u64(&mut self) -> Result<u64, ProtocolError> {
        self.fixed(8, |c| c.read_u64::<LittleEndian>())
    }

    pub fn read_i64(&mut self) -> Result<i64, ProtocolError> {
        self.fixed(8, |c| c.read_i64::<LittleEndian>())
    }

    /// Reads one byte as a boolean: any non-zero value is `true`.
    pub fn read_bool(&mut self) -> Result<bool, ProtocolError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads exactly `len` bytes into a new vector.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = vec![0u8; len.min(self.remaining())];
        if buf.len() < len {
            return Err(self.truncated(len));
        }
        self.cursor
            .read_exact(&mut buf)
            .map_err(|_| self.truncated(len))?;
        Ok(buf)
    }

    /// Advances past `len` bytes without keeping them.
    pub fn skip(&mut self, len: usize) -> Result<(), ProtocolError> {
        if self.remaining() < len {
            return Err(self.truncated(len));
        }
        self.cursor.set_position((self.position() + len) as u64);
        Ok(())
    }

    /// Reads the bytes before the next zero byte as UTF-8, then consumes
    /// the terminator. A terminator in first position yields `""`.
    ///
    /// # Errors
    /// - [`ProtocolError::Truncated`] if no terminator remains
    /// - [`ProtocolError::InvalidUtf8`] if the bytes are not UTF-8
    pub fn read_cstring(&mut self) -> Result<String, ProtocolError> {
        let rest = self.rest();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.truncated(rest.len() + 1))?;
        let text = std::str::from_utf8(&rest[..len])
            .map_err(|_| ProtocolError::InvalidUtf8)?
            .to_owned();
        self.skip(len + 1)?;
        Ok(text)
    }

    /// Runs a fixed-width read, mapping a short buffer to `Truncated`.
    fn fixed<T>(
        &mut self,
        width: usize,
        read: impl FnOnce(&mut Cursor<&'a [u8]>) -> io::Result<T>,
    ) -> Result<T, ProtocolError> {
        if self.remaining() < width {
            return Err(self.truncated(width));
        }
        read(&mut self.cursor).map_err(|_| self.truncated(width))
    }

    fn truncated(&self, needed: usize) -> ProtocolError {
        ProtocolError::Truncated {
            needed,
            remaining: self.remaining(),
        }
    }
}

/// Returns the bytes before the first zero byte (or all of them if there
/// is none), decoded lossily as UTF-8.
///
/// Message text arrives padded or terminated inconsistently; everything
/// from the first terminator on is dropped before the text is exposed.
pub fn text_until_nul(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
