// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Little-endian memory stream used by every codec.
//!
//! Values are written back to back with no framing; each codec knows how
//! many bytes it owns. Writes append at the end, reads advance an
//! independent read cursor.

use std::fmt;

/// Errors while reading from a [`MemoryStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Not enough bytes left for the requested read.
    Exhausted { need: usize, have: usize },
    /// String payload was not valid UTF-8.
    InvalidUtf8,
    /// Payload bytes are structurally wrong (bad tag, missing terminator...).
    InvalidData(String),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { need, have } => {
                write!(f, "stream exhausted: need {} bytes, have {}", need, have)
            }
            Self::InvalidUtf8 => write!(f, "invalid UTF-8 in string payload"),
            Self::InvalidData(msg) => write!(f, "invalid data: {}", msg),
        }
    }
}

impl std::error::Error for StreamError {}

/// Growable byte buffer with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStream {
    buffer: Vec<u8>,
    rpos: usize,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            rpos: 0,
        }
    }

    /// Wrap existing bytes for reading.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: bytes.into(),
            rpos: 0,
        }
    }

    /// Total bytes written.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Write position (equals [`len`](Self::len)).
    pub fn wpos(&self) -> usize {
        self.buffer.len()
    }

    pub fn rpos(&self) -> usize {
        self.rpos
    }

    /// Move the read cursor. Clamped to the written length.
    pub fn set_rpos(&mut self, rpos: usize) {
        self.rpos = rpos.min(self.buffer.len());
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.rpos)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Drop everything written after `wpos`.
    pub fn truncate(&mut self, wpos: usize) {
        self.buffer.truncate(wpos);
        self.rpos = self.rpos.min(self.buffer.len());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.rpos = 0;
    }

    // -- writes ----------------------------------------------------------

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buffer.push(u8::from(v));
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buffer.push(v);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buffer.extend(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buffer.extend(&v.to_le_bytes());
    }

    /// u32 length (including the terminator), bytes, NUL.
    ///
    /// The caller keeps `s` under `u32::MAX` bytes; codecs check this
    /// before writing.
    pub fn write_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        debug_assert!(bytes.len() < u32::MAX as usize);
        self.write_u32((bytes.len() + 1) as u32);
        self.buffer.extend_from_slice(bytes);
        self.buffer.push(0);
    }

    /// u32 length, raw bytes. Same length bound as [`write_string`](Self::write_string).
    pub fn write_blob(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= u32::MAX as usize);
        self.write_u32(bytes.len() as u32);
        self.buffer.extend_from_slice(bytes);
    }

    // -- reads -----------------------------------------------------------

    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8], StreamError> {
        if count > self.remaining() {
            return Err(StreamError::Exhausted {
                need: count,
                have: self.remaining(),
            });
        }
        let start = self.rpos;
        self.rpos += count;
        Ok(&self.buffer[start..start + count])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool, StreamError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, StreamError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, StreamError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i8(&mut self) -> Result<i8, StreamError> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, StreamError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, StreamError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, StreamError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64, StreamError> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_string(&mut self) -> Result<String, StreamError> {
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Err(StreamError::InvalidData(
                "string length must include terminator".into(),
            ));
        }
        let bytes = self.read_bytes(len)?;
        let (body, terminator) = bytes.split_at(len - 1);
        if terminator != [0] {
            return Err(StreamError::InvalidData("missing string terminator".into()));
        }
        String::from_utf8(body.to_vec()).map_err(|_| StreamError::InvalidUtf8)
    }

    pub fn read_blob(&mut self) -> Result<Vec<u8>, StreamError> {
        let len = self.read_u32()? as usize;
        Ok(self.read_bytes(len)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_little_endian() {
        let mut s = MemoryStream::new();
        s.write_u16(0x0102);
        s.write_i32(-2);
        assert_eq!(s.as_bytes(), &[0x02, 0x01, 0xfe, 0xff, 0xff, 0xff]);

        assert_eq!(s.read_u16().unwrap(), 0x0102);
        assert_eq!(s.read_i32().unwrap(), -2);
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_string_layout() {
        let mut s = MemoryStream::new();
        s.write_string("hi");
        assert_eq!(s.as_bytes(), &[3, 0, 0, 0, b'h', b'i', 0]);
        assert_eq!(s.read_string().unwrap(), "hi");
    }

    #[test]
    fn test_read_past_end() {
        let mut s = MemoryStream::from_bytes(vec![1, 2, 3]);
        let err = s.read_u32().unwrap_err();
        assert_eq!(err, StreamError::Exhausted { need: 4, have: 3 });
        // Cursor not advanced by the failed read
        assert_eq!(s.rpos(), 0);
    }

    #[test]
    fn test_string_without_terminator() {
        let mut s = MemoryStream::new();
        s.write_u32(2);
        s.write_bytes(b"ab");
        assert!(matches!(
            s.read_string(),
            Err(StreamError::InvalidData(_))
        ));
    }

    #[test]
    fn test_truncate_rolls_back_writes() {
        let mut s = MemoryStream::new();
        s.write_u32(7);
        let mark = s.wpos();
        s.write_blob(b"partial");
        s.truncate(mark);
        assert_eq!(s.len(), 4);
    }
}
