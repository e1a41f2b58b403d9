//! Component A — the byte buffer and primitive codec.
//!
//! `ByteReader` borrows a byte slice and tracks a read cursor; `ByteWriter`
//! owns a growable byte vector and only ever appends. Every multi-byte
//! primitive is little-endian, per the corpus this format was derived from
//! (see `SPEC_FULL.md` §9 for the byte-order decision).

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use crate::error::MudError;

/// A read-only cursor over an in-memory MUD byte stream.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            cursor: Cursor::new(data),
        }
    }

    /// Current read position, in bytes from the start of the slice.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        let data = *self.cursor.get_ref();
        data.len() - self.cursor.position() as usize
    }

    fn eof(&self, what: &str) -> MudError {
        MudError::CorruptSection(format!(
            "unexpected end of payload while reading {what} at offset {}",
            self.cursor.position()
        ))
    }

    pub fn read_u16(&mut self) -> crate::error::Result<u16> {
        self.cursor.read_u16::<LittleEndian>().map_err(|_| self.eof("u16"))
    }

    pub fn read_u32(&mut self) -> crate::error::Result<u32> {
        self.cursor.read_u32::<LittleEndian>().map_err(|_| self.eof("u32"))
    }

    pub fn read_i16(&mut self) -> crate::error::Result<i16> {
        self.cursor.read_i16::<LittleEndian>().map_err(|_| self.eof("i16"))
    }

    pub fn read_i32(&mut self) -> crate::error::Result<i32> {
        self.cursor.read_i32::<LittleEndian>().map_err(|_| self.eof("i32"))
    }

    pub fn read_f64(&mut self) -> crate::error::Result<f64> {
        self.cursor.read_f64::<LittleEndian>().map_err(|_| self.eof("f64"))
    }

    /// `u32` seconds since 1970-01-01 UTC. Kept as `u32` end to end — this
    /// is a file-format contract, not a host time representation.
    pub fn read_time(&mut self) -> crate::error::Result<u32> {
        self.read_u32()
    }

    /// `u16`-length-prefixed, no trailing NUL. Invalid UTF-8 is replaced
    /// rather than treated as corruption, since the format only promises
    /// a byte/char sequence, not a guaranteed-valid one.
    pub fn read_str(&mut self) -> crate::error::Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_raw(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn read_raw(&mut self, n: usize) -> crate::error::Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(self.eof(&format!("{n} raw bytes")));
        }
        let start = self.cursor.position() as usize;
        let data = *self.cursor.get_ref();
        self.cursor.set_position((start + n) as u64);
        Ok(&data[start..start + n])
    }
}

/// An append-only byte buffer used to build an encoded MUD stream.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter { buf: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.write_u16::<LittleEndian>(v).expect("Vec<u8> writes never fail");
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.write_u32::<LittleEndian>(v).expect("Vec<u8> writes never fail");
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.write_i16::<LittleEndian>(v).expect("Vec<u8> writes never fail");
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.write_i32::<LittleEndian>(v).expect("Vec<u8> writes never fail");
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.write_f64::<LittleEndian>(v).expect("Vec<u8> writes never fail");
    }

    pub fn write_time(&mut self, v: u32) {
        self.write_u32(v);
    }

    pub fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.write_u16(bytes.len() as u16);
        self.write_raw(bytes);
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
}
