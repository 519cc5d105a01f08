//! Little-endian field writer and bounds-checked reader.

use crate::error::CodecError;

/// Largest value of a three-byte field.
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Append-only little-endian buffer.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes the low three bytes of `value`.
    pub fn put_u24(&mut self, field: &'static str, value: u32) -> Result<(), CodecError> {
        if value > U24_MAX {
            return Err(CodecError::ValueOverflow {
                field,
                value: value as u64,
                max: U24_MAX as u64,
            });
        }
        self.buf.extend_from_slice(&value.to_le_bytes()[..3]);
        Ok(())
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a `u32` byte length followed by the UTF-8 bytes.
    pub fn put_str(&mut self, value: &str) -> Result<(), CodecError> {
        let len = narrow::<u32>("string length", value.len())?;
        self.put_u32(len);
        self.buf.extend_from_slice(value.as_bytes());
        Ok(())
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a byte slice. Every read fails with [`CodecError::Truncated`]
/// instead of running past the end.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos + n;
        if end > self.data.len() {
            return Err(CodecError::Truncated {
                expected: end,
                actual: self.data.len(),
            });
        }
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    pub fn bool(&mut self) -> Result<bool, CodecError> {
        Ok(self.u8()? != 0)
    }

    pub fn u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn u24(&mut self) -> Result<u32, CodecError> {
        let b = self.take(3)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], 0]))
    }

    pub fn i32(&mut self) -> Result<i32, CodecError> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn string(&mut self) -> Result<String, CodecError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::BadString)
    }
}

/// Converts `value` into a narrower field type, reporting overflow by field name.
pub fn narrow<T>(field: &'static str, value: usize) -> Result<T, CodecError>
where
    T: TryFrom<usize> + Into<u64> + Bounded,
{
    T::try_from(value).map_err(|_| CodecError::ValueOverflow {
        field,
        value: value as u64,
        max: T::MAX_VALUE.into(),
    })
}

/// Unsigned field types with a known maximum.
pub trait Bounded: Sized {
    const MAX_VALUE: Self;
}

impl Bounded for u8 {
    const MAX_VALUE: Self = u8::MAX;
}

impl Bounded for u16 {
    const MAX_VALUE: Self = u16::MAX;
}

impl Bounded for u32 {
    const MAX_VALUE: Self = u32::MAX;
}
