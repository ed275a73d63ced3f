use crate::endian::ByteOrder;
use crate::ieee754;
use crate::varint::MORE;

use zerocopy::byteorder::{BE, I16, I32, I64, LE, U16, U32, U64};

/// Result type for `StructReader`
pub type Result<T> = core::result::Result<T, ReaderError>;

/// Reads fields from a slice of bytes.
///
/// Every read is bounds-checked. Fixed-width integers and floats are read in the byte order
/// passed to each call; the reader itself has no notion of a "current" byte order, that is
/// tracked by the format interpreter.
///
/// If a read fails with `Err(ReaderError::NeedsMoreData)`, `data` may already have been
/// advanced past part of the field. Callers that want to retry with more data should save
/// `data` (or its length) before reading.
pub struct StructReader<'a> {
    /// The input data being parsed. Each time a value is parsed from `data`, `data` is reassigned
    /// to the remaining data.
    pub data: &'a [u8],
}

impl<'a> StructReader<'a> {
    /// Constructor
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the number of bytes consumed since `start`, which must be the slice this reader
    /// was created from.
    pub fn consumed_since(&self, start: &[u8]) -> usize {
        start.len() - self.data.len()
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        if let Some((&value, rest)) = self.data.split_first() {
            self.data = rest;
            Ok(value)
        } else {
            Err(ReaderError::NeedsMoreData)
        }
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Skips `len` bytes.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len)?;
        Ok(())
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            Err(ReaderError::NeedsMoreData)
        } else {
            let (lo, hi) = self.data.split_at(len);
            self.data = hi;
            Ok(lo)
        }
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let Some((lo, hi)) = self.data.split_first_chunk::<N>() else {
            return Err(ReaderError::NeedsMoreData);
        };
        self.data = hi;
        Ok(*lo)
    }

    /// Reads a `u16` in the given byte order.
    #[inline(always)]
    pub fn read_u16(&mut self, order: ByteOrder) -> Result<u16> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => U16::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => U16::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads a `u32` in the given byte order.
    #[inline(always)]
    pub fn read_u32(&mut self, order: ByteOrder) -> Result<u32> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => U32::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => U32::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads a `u64` in the given byte order.
    #[inline(always)]
    pub fn read_u64(&mut self, order: ByteOrder) -> Result<u64> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => U64::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => U64::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads an `i16` in the given byte order.
    #[inline(always)]
    pub fn read_i16(&mut self, order: ByteOrder) -> Result<i16> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => I16::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => I16::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads an `i32` in the given byte order.
    #[inline(always)]
    pub fn read_i32(&mut self, order: ByteOrder) -> Result<i32> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => I32::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => I32::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads an `i64` in the given byte order.
    #[inline(always)]
    pub fn read_i64(&mut self, order: ByteOrder) -> Result<i64> {
        let bytes = self.read_cbytes()?;
        Ok(match order {
            ByteOrder::Little => I64::<LE>::from_bytes(bytes).get(),
            ByteOrder::Big => I64::<BE>::from_bytes(bytes).get(),
        })
    }

    /// Reads an IEEE-754 binary32 value in the given byte order.
    pub fn read_f32(&mut self, order: ByteOrder) -> Result<f32> {
        Ok(ieee754::unpack_f32(self.read_u32(order)?))
    }

    /// Reads an IEEE-754 binary64 value in the given byte order.
    pub fn read_f64(&mut self, order: ByteOrder) -> Result<f64> {
        Ok(ieee754::unpack_f64(self.read_u64(order)?))
    }

    /// Reads an unsigned variable-length integer.
    ///
    /// Reading stops at the first byte whose continuation bit is clear. An encoding that has
    /// not terminated after 10 bytes is rejected with `ReaderError::Invalid`. Bits beyond the
    /// 64th in the 10th byte are ignored.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut shift: u32 = 0;
        let mut n: u64 = 0;

        loop {
            let b = self.read_u8()?;
            n |= ((b & 0x7f) as u64) << shift;

            if (b & MORE) == 0 {
                break;
            }

            shift += 7;
            if shift >= 64 {
                return Err(ReaderError::Invalid);
            }
        }

        Ok(n)
    }

    /// Reads a signed variable-length integer.
    pub fn read_signed_varint(&mut self) -> Result<i64> {
        Ok(crate::varint::zigzag_decode(self.read_varint()?))
    }
}

/// Error type for `StructReader`
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReaderError {
    /// A `read_*` method reached the end of the input data, but requires more data to finish
    /// reading the input.
    NeedsMoreData,

    /// The `read_*` request found invalid data in the input. The input is malformed.
    Invalid,
}

impl core::error::Error for ReaderError {}

impl core::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NeedsMoreData => f.write_str("The input ended in the middle of a field"),
            Self::Invalid => f.write_str("The input is malformed"),
        }
    }
}
