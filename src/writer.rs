use crate::endian::ByteOrder;
use crate::ieee754;
use crate::varint::MORE;

use zerocopy::byteorder::{BE, LE, U16, U32, U64};

/// Result type for `StructWriter`
pub type Result<T> = core::result::Result<T, WriterError>;

/// Writes fields into a caller-supplied byte buffer.
///
/// The writer never allocates. Every write is bounds-checked; a write that does not fit fails
/// with `WriterError::BufferFull` and leaves both the buffer and the position unchanged.
pub struct StructWriter<'a> {
    /// The output buffer.
    pub out: &'a mut [u8],
    /// The number of bytes written so far. The next write starts at this offset.
    pub pos: usize,
}

impl<'a> StructWriter<'a> {
    /// Creates a writer that starts at the beginning of `out`.
    pub fn new(out: &'a mut [u8]) -> Self {
        Self { out, pos: 0 }
    }

    /// Returns the bytes written so far.
    pub fn written(&self) -> &[u8] {
        &self.out[..self.pos]
    }

    /// Returns the number of bytes that can still be written.
    pub fn remaining(&self) -> usize {
        self.out.len() - self.pos
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.advance(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Claims the next `len` bytes of the output and returns them.
    fn advance(&mut self, len: usize) -> Result<&mut [u8]> {
        let start = self.pos;
        let end = start.checked_add(len).ok_or(WriterError::BufferFull)?;
        if end > self.out.len() {
            return Err(WriterError::BufferFull);
        }
        self.pos = end;
        Ok(&mut self.out[start..end])
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) -> Result<()> {
        self.write_bytes(&value)
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write_bytes(&[value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write_bytes(&[value as u8])
    }

    /// Writes `len` zero bytes.
    pub fn write_zeros(&mut self, len: usize) -> Result<()> {
        self.advance(len)?.fill(0);
        Ok(())
    }

    /// Writes a `u16` in the given byte order.
    pub fn write_u16(&mut self, value: u16, order: ByteOrder) -> Result<()> {
        self.write_cbytes(match order {
            ByteOrder::Little => U16::<LE>::new(value).to_bytes(),
            ByteOrder::Big => U16::<BE>::new(value).to_bytes(),
        })
    }

    /// Writes a `u32` in the given byte order.
    pub fn write_u32(&mut self, value: u32, order: ByteOrder) -> Result<()> {
        self.write_cbytes(match order {
            ByteOrder::Little => U32::<LE>::new(value).to_bytes(),
            ByteOrder::Big => U32::<BE>::new(value).to_bytes(),
        })
    }

    /// Writes a `u64` in the given byte order.
    pub fn write_u64(&mut self, value: u64, order: ByteOrder) -> Result<()> {
        self.write_cbytes(match order {
            ByteOrder::Little => U64::<LE>::new(value).to_bytes(),
            ByteOrder::Big => U64::<BE>::new(value).to_bytes(),
        })
    }

    /// Writes an `i16` in the given byte order, as its two's complement bit pattern.
    pub fn write_i16(&mut self, value: i16, order: ByteOrder) -> Result<()> {
        self.write_u16(value as u16, order)
    }

    /// Writes an `i32` in the given byte order, as its two's complement bit pattern.
    pub fn write_i32(&mut self, value: i32, order: ByteOrder) -> Result<()> {
        self.write_u32(value as u32, order)
    }

    /// Writes an `i64` in the given byte order, as its two's complement bit pattern.
    pub fn write_i64(&mut self, value: i64, order: ByteOrder) -> Result<()> {
        self.write_u64(value as u64, order)
    }

    /// Writes an `f32` as its IEEE-754 binary32 bit pattern, in the given byte order.
    pub fn write_f32(&mut self, value: f32, order: ByteOrder) -> Result<()> {
        self.write_u32(ieee754::pack_f32(value), order)
    }

    /// Writes an `f64` as its IEEE-754 binary64 bit pattern, in the given byte order.
    pub fn write_f64(&mut self, value: f64, order: ByteOrder) -> Result<()> {
        self.write_u64(ieee754::pack_f64(value), order)
    }

    /// Encodes a `u64` value using the variable-length encoding. This writes between 1 and 10
    /// bytes.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; crate::varint::MAX_VARINT_LEN];
        let mut len = 0;
        let mut n = value;

        loop {
            if n < 0x80 {
                buf[len] = n as u8;
                len += 1;
                break;
            }
            buf[len] = (n & 0x7f) as u8 | MORE;
            len += 1;
            n >>= 7;
        }

        self.write_bytes(&buf[..len])
    }

    /// Encodes an `i64` value using the signed variable-length encoding. Small negative values
    /// are as short as small positive values; `-1` encodes as the single byte `0x01`.
    pub fn write_signed_varint(&mut self, value: i64) -> Result<()> {
        self.write_varint(crate::varint::zigzag_encode(value))
    }
}

/// Error type for `StructWriter`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum WriterError {
    /// The output buffer does not have room for the value being written.
    BufferFull,
}

impl core::error::Error for WriterError {}

impl core::fmt::Display for WriterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferFull => f.write_str("The output buffer is full"),
        }
    }
}
