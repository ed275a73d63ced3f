//! Packs native scalar values into byte buffers and unpacks them again, driven by format
//! strings in the style of Python's `struct` module.
//!
//! ```
//! use structpack::{pack, unpack, calcsize, Value};
//!
//! let mut buf = [0u8; 16];
//! let values = [Value::U16(0x0102), Value::I32(-2), Value::UVarInt(300)];
//! let len = pack(&mut buf, "<HiV", &values)?;
//! assert_eq!(&buf[..len], [0x02, 0x01, 0xfe, 0xff, 0xff, 0xff, 0xac, 0x02]);
//! assert_eq!(calcsize("<HiV")?, 16);
//!
//! let (decoded, consumed) = unpack(&buf[..len], "<HiV")?;
//! assert_eq!(decoded, values);
//! assert_eq!(consumed, len);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Format characters
//!
//! | Character | Encoded bytes | Value |
//! |---|---|---|
//! | `b` / `B` | 1 | `i8` / `u8` |
//! | `h` / `H` | 2 | `i16` / `u16` |
//! | `i` / `I` | 4, or 2 on 16-bit targets | `i32` / `u32` |
//! | `l` / `L` | 4 | `i32` / `u32` |
//! | `q` / `Q` | 8 | `i64` / `u64` |
//! | `f` | 4 | `f32` |
//! | `d` | 8 | `f64` |
//! | `s` / `p` | 1 | one raw byte |
//! | `x` | 1 | none; a zero byte, skipped when unpacking |
//! | `v` | 1 to 10 | `i64`, signed varint |
//! | `V` | 1 to 10 | `u64`, unsigned varint |
//!
//! A decimal repeat count may precede any of these: `"3h"` is the same as `"hhh"`. Note that
//! `"4s"` is four separate one-byte values, not a four-byte string.
//!
//! The endianness markers `=` (native), `<` (little), `>` (big) and `!` (network, which is
//! big) select the byte order for every field that follows them, up to the next marker. A
//! format starts out in native order.
//!
//! # Features
//!
//! * `std` (default): adds `From<Error> for std::io::Error`. Without it the crate is `no_std`
//!   and needs only `alloc`.
//! * `log` (default): reports rejected formats and inputs at `debug` level, and completed
//!   calls at `trace` level, through the `log` facade.
//!
//! # References
//! * <https://docs.python.org/3/library/struct.html>

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
        #[cfg(not(feature = "log"))]
        {
            fn discard(_: core::fmt::Arguments<'_>) {}
            discard(format_args!($($arg)*));
        }
    }};
}

macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
        #[cfg(not(feature = "log"))]
        {
            fn discard(_: core::fmt::Arguments<'_>) {}
            discard(format_args!($($arg)*));
        }
    }};
}

mod codec;
mod endian;
mod format;
pub mod ieee754;
mod reader;
mod value;
pub mod varint;
mod writer;


pub use codec::{Codec, Error, Result};
pub use endian::{native_endian, ByteOrder, Endian, NATIVE_ENDIAN};
pub use format::{Directive, Format, FormatError, IntWidth, Token, Tokens};
pub use reader::{ReaderError, StructReader};
pub use value::Value;
pub use writer::{StructWriter, WriterError};

use alloc::vec::Vec;

/// Packs `values` into the start of `buf` using the host's byte order and `int` width, and
/// returns the number of bytes written. See [`Codec::pack`].
pub fn pack(buf: &mut [u8], format: &str, values: &[Value]) -> Result<usize> {
    Codec::new().pack(buf, format, values)
}

/// Packs `values` into `buf` starting at `offset`. See [`Codec::pack_into`].
pub fn pack_into(buf: &mut [u8], offset: usize, format: &str, values: &[Value]) -> Result<usize> {
    Codec::new().pack_into(buf, offset, format, values)
}

/// Packs `values` into a new `Vec<u8>`. See [`Codec::pack_to_vec`].
pub fn pack_to_vec(format: &str, values: &[Value]) -> Result<Vec<u8>> {
    Codec::new().pack_to_vec(format, values)
}

/// Unpacks values from the start of `buf`, and returns them along with the number of bytes
/// consumed. See [`Codec::unpack`].
pub fn unpack(buf: &[u8], format: &str) -> Result<(Vec<Value>, usize)> {
    Codec::new().unpack(buf, format)
}

/// Unpacks values from `buf` starting at `offset`. See [`Codec::unpack_from`].
pub fn unpack_from(buf: &[u8], offset: usize, format: &str) -> Result<(Vec<Value>, usize)> {
    Codec::new().unpack_from(buf, offset, format)
}

/// Returns the buffer size needed to pack `format`; an upper bound if it contains varints.
/// See [`Codec::calcsize`].
pub fn calcsize(format: &str) -> core::result::Result<usize, FormatError> {
    Codec::new().calcsize(format)
}
