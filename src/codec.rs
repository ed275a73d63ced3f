use crate::endian::{ByteOrder, NATIVE_ENDIAN};
use crate::format::{Directive, Format, FormatError, IntWidth};
use crate::reader::{ReaderError, StructReader};
use crate::value::Value;
use crate::varint;
use crate::writer::{StructWriter, WriterError};

use alloc::vec;
use alloc::vec::Vec;

/// Result type for `Codec`
pub type Result<T> = core::result::Result<T, Error>;

/// Packs and unpacks values according to format strings.
///
/// A `Codec` holds the two platform facts that the format characters depend on: the byte order
/// that `=` selects, and the width of `i`/`I`. Both default to the properties of the build
/// target, and both can be overridden, for example to produce the bytes another host would.
///
/// A `Codec` is an immutable `Copy` value and can be shared freely between threads.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Codec {
    native: ByteOrder,
    int_width: IntWidth,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec {
    /// A codec configured for the build target.
    pub const fn new() -> Self {
        Self {
            native: NATIVE_ENDIAN,
            int_width: IntWidth::NATIVE,
        }
    }

    /// Returns a codec that resolves `=` to `order`.
    pub const fn with_native_order(self, order: ByteOrder) -> Self {
        Self {
            native: order,
            ..self
        }
    }

    /// Returns a codec that encodes `i` and `I` with the given width.
    pub const fn with_int_width(self, int_width: IntWidth) -> Self {
        Self { int_width, ..self }
    }

    /// The byte order that `=` selects.
    pub const fn native_order(&self) -> ByteOrder {
        self.native
    }

    /// The encoded width of `i` and `I`.
    pub const fn int_width(&self) -> IntWidth {
        self.int_width
    }

    /// Returns the buffer size needed to pack `format`.
    ///
    /// Each `v` and `V` field counts as 10 bytes, the most a varint can take, so for formats
    /// that contain them the result is an upper bound rather than an exact size. Endianness
    /// markers do not affect the size.
    pub fn calcsize(&self, format: &str) -> core::result::Result<usize, FormatError> {
        let format = Format::parse(format).inspect_err(|e| {
            debug!("calcsize: rejected format {format:?}: {e}");
        })?;
        self.calcsize_format(&format)
    }

    /// Same as [`Codec::calcsize`], for a format that has already been parsed.
    pub fn calcsize_format(&self, format: &Format<'_>) -> core::result::Result<usize, FormatError> {
        format
            .fields()
            .try_fold(0usize, |total, (_, directive, count)| {
                directive
                    .max_encoded_size(self.int_width)
                    .checked_mul(count)
                    .and_then(|n| total.checked_add(n))
            })
            .ok_or(FormatError::SizeOverflow)
    }

    /// Returns the exact number of bytes that packing `values` with `format` produces.
    ///
    /// This checks the values the same way [`Codec::pack`] does.
    pub fn encoded_len(&self, format: &str, values: &[Value]) -> Result<usize> {
        self.measure(&Format::parse(format)?, values)
    }

    /// Packs `values` into the start of `buf`, and returns the number of bytes written.
    ///
    /// The format and the values are checked before anything is written: if this function
    /// fails, `buf` is left untouched.
    pub fn pack(&self, buf: &mut [u8], format: &str, values: &[Value]) -> Result<usize> {
        self.pack_into(buf, 0, format, values)
    }

    /// Packs `values` into `buf` starting at `offset`, and returns the number of bytes written.
    ///
    /// If this function fails, `buf` is left untouched.
    pub fn pack_into(
        &self,
        buf: &mut [u8],
        offset: usize,
        format: &str,
        values: &[Value],
    ) -> Result<usize> {
        let result = self.pack_into_checked(buf, offset, format, values);
        match &result {
            Ok(len) => trace!("pack {format:?}: {} values, {len} bytes", values.len()),
            Err(e) => debug!("pack {format:?}: {e}"),
        }
        result
    }

    fn pack_into_checked(
        &self,
        buf: &mut [u8],
        offset: usize,
        format: &str,
        values: &[Value],
    ) -> Result<usize> {
        let format = Format::parse(format)?;
        let needed = self.measure(&format, values)?;
        let available = buf.len().saturating_sub(offset);
        if offset > buf.len() || needed > available {
            return Err(Error::BufferTooSmall { needed, available });
        }

        let mut w = StructWriter::new(&mut buf[offset..]);
        self.pack_to_writer(&mut w, &format, values)?;
        Ok(w.pos)
    }

    /// Packs `values` into a new `Vec<u8>` of exactly the encoded length.
    pub fn pack_to_vec(&self, format: &str, values: &[Value]) -> Result<Vec<u8>> {
        let mut buf = vec![0; self.encoded_len(format, values)?];
        let len = self.pack(&mut buf, format, values)?;
        buf.truncate(len);
        Ok(buf)
    }

    /// Packs `values` through an existing writer.
    ///
    /// Unlike [`Codec::pack`], this writes each field as soon as it reaches it. If it fails
    /// partway, the fields before the failure have already been written and `w.pos` has moved
    /// past them.
    pub fn pack_to_writer(
        &self,
        w: &mut StructWriter<'_>,
        format: &Format<'_>,
        values: &[Value],
    ) -> Result<()> {
        let mut index = 0;

        for (endian, directive, count) in format.fields() {
            let order = endian.resolve(self.native);

            if !directive.takes_value() {
                w.write_zeros(count)?;
                continue;
            }

            for _ in 0..count {
                let value = next_value(values, index, directive)?;
                self.write_value(w, directive, order, value, index)?;
                index += 1;
            }
        }

        check_all_used(index, values)
    }

    fn write_value(
        &self,
        w: &mut StructWriter<'_>,
        directive: Directive,
        order: ByteOrder,
        value: Value,
        index: usize,
    ) -> Result<()> {
        match (directive, value) {
            (Directive::Int, Value::I32(n)) if self.int_width == IntWidth::Sixteen => {
                let n = i16::try_from(n)
                    .map_err(|_| Error::ValueOutOfRange { index, directive })?;
                w.write_i16(n, order)?;
            }
            (Directive::UInt, Value::U32(n)) if self.int_width == IntWidth::Sixteen => {
                let n = u16::try_from(n)
                    .map_err(|_| Error::ValueOutOfRange { index, directive })?;
                w.write_u16(n, order)?;
            }
            (_, Value::I8(n)) => w.write_i8(n)?,
            (_, Value::U8(n) | Value::Char(n)) => w.write_u8(n)?,
            (_, Value::I16(n)) => w.write_i16(n, order)?,
            (_, Value::U16(n)) => w.write_u16(n, order)?,
            (_, Value::I32(n)) => w.write_i32(n, order)?,
            (_, Value::U32(n)) => w.write_u32(n, order)?,
            (_, Value::I64(n)) => w.write_i64(n, order)?,
            (_, Value::U64(n)) => w.write_u64(n, order)?,
            (_, Value::F32(x)) => w.write_f32(x, order)?,
            (_, Value::F64(x)) => w.write_f64(x, order)?,
            (_, Value::VarInt(n)) => w.write_signed_varint(n)?,
            (_, Value::UVarInt(n)) => w.write_varint(n)?,
        }
        Ok(())
    }

    /// Checks `values` against `format` and returns the exact encoded length.
    fn measure(&self, format: &Format<'_>, values: &[Value]) -> Result<usize> {
        let mut index = 0;
        let mut total: usize = 0;

        for (_, directive, count) in format.fields() {
            if !directive.takes_value() {
                total = total.checked_add(count).ok_or(FormatError::SizeOverflow)?;
                continue;
            }

            for _ in 0..count {
                let value = next_value(values, index, directive)?;
                let len = match value {
                    Value::VarInt(n) => varint::signed_encoded_len(n),
                    Value::UVarInt(n) => varint::encoded_len(n),
                    _ if self.narrow_int(directive) => {
                        let range = match directive {
                            Directive::Int => i128::from(i16::MIN)..=i128::from(i16::MAX),
                            _ => 0..=i128::from(u16::MAX),
                        };
                        if !value.as_integer().is_some_and(|n| range.contains(&n)) {
                            return Err(Error::ValueOutOfRange { index, directive });
                        }
                        2
                    }
                    _ => directive.max_encoded_size(self.int_width),
                };
                total = total.checked_add(len).ok_or(FormatError::SizeOverflow)?;
                index += 1;
            }
        }

        check_all_used(index, values)?;
        Ok(total)
    }

    fn narrow_int(&self, directive: Directive) -> bool {
        matches!(directive, Directive::Int | Directive::UInt) && self.int_width == IntWidth::Sixteen
    }

    /// Unpacks values from the start of `buf`.
    ///
    /// Returns the values in format order and the number of bytes consumed. Bytes after the
    /// last field are ignored.
    pub fn unpack(&self, buf: &[u8], format: &str) -> Result<(Vec<Value>, usize)> {
        self.unpack_from(buf, 0, format)
    }

    /// Unpacks values from `buf`, starting at `offset`.
    ///
    /// Returns the values in format order and the number of bytes consumed, not counting
    /// `offset`.
    pub fn unpack_from(
        &self,
        buf: &[u8],
        offset: usize,
        format: &str,
    ) -> Result<(Vec<Value>, usize)> {
        let result = self.unpack_from_checked(buf, offset, format);
        match &result {
            Ok((values, len)) => {
                trace!("unpack {format:?}: {} values, {len} bytes", values.len())
            }
            Err(e) => debug!("unpack {format:?}: {e}"),
        }
        result
    }

    fn unpack_from_checked(
        &self,
        buf: &[u8],
        offset: usize,
        format: &str,
    ) -> Result<(Vec<Value>, usize)> {
        let format = Format::parse(format)?;
        let Some(input) = buf.get(offset..) else {
            return Err(Error::TruncatedInput);
        };

        // Every value takes at least one byte of input. The count is only a hint, so a total
        // that overflows still decodes until the input runs out.
        let hint = format.value_count().unwrap_or(usize::MAX);
        let mut values = Vec::with_capacity(hint.min(input.len()));
        let mut r = StructReader::new(input);
        self.unpack_from_reader(&mut r, &format, &mut values)?;
        Ok((values, r.consumed_since(input)))
    }

    /// Unpacks values through an existing reader, appending them to `out`.
    ///
    /// If this fails partway, the values decoded before the failure remain in `out`.
    pub fn unpack_from_reader(
        &self,
        r: &mut StructReader<'_>,
        format: &Format<'_>,
        out: &mut Vec<Value>,
    ) -> Result<()> {
        for (endian, directive, count) in format.fields() {
            let order = endian.resolve(self.native);

            for _ in 0..count {
                if let Some(value) = self.read_value(r, directive, order)? {
                    out.push(value);
                }
            }
        }
        Ok(())
    }

    /// Decodes one repetition of `directive`. `x` skips its byte and produces no value.
    fn read_value(
        &self,
        r: &mut StructReader<'_>,
        directive: Directive,
        order: ByteOrder,
    ) -> Result<Option<Value>> {
        Ok(Some(match directive {
            Directive::SignedByte => Value::I8(r.read_i8()?),
            Directive::Byte => Value::U8(r.read_u8()?),
            Directive::Char => Value::Char(r.read_u8()?),
            Directive::Short => Value::I16(r.read_i16(order)?),
            Directive::UShort => Value::U16(r.read_u16(order)?),
            Directive::Int if self.int_width == IntWidth::Sixteen => {
                Value::I32(r.read_i16(order)?.into())
            }
            Directive::UInt if self.int_width == IntWidth::Sixteen => {
                Value::U32(r.read_u16(order)?.into())
            }
            Directive::Int | Directive::Long => Value::I32(r.read_i32(order)?),
            Directive::UInt | Directive::ULong => Value::U32(r.read_u32(order)?),
            Directive::LongLong => Value::I64(r.read_i64(order)?),
            Directive::ULongLong => Value::U64(r.read_u64(order)?),
            Directive::Float => Value::F32(r.read_f32(order)?),
            Directive::Double => Value::F64(r.read_f64(order)?),
            Directive::VarInt => Value::VarInt(r.read_signed_varint()?),
            Directive::UVarInt => Value::UVarInt(r.read_varint()?),
            Directive::Pad => {
                r.skip(1)?;
                return Ok(None);
            }
        }))
    }
}

fn next_value(values: &[Value], index: usize, directive: Directive) -> Result<Value> {
    let Some(&value) = values.get(index) else {
        return Err(Error::MissingValue { index, directive });
    };
    if !value.matches(directive) {
        return Err(Error::ValueMismatch { index, directive });
    }
    Ok(value)
}

fn check_all_used(used: usize, values: &[Value]) -> Result<()> {
    if used < values.len() {
        Err(Error::ExcessValues {
            expected: used,
            supplied: values.len(),
        })
    } else {
        Ok(())
    }
}

/// Error type for `Codec`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// The format string is malformed.
    Format(FormatError),

    /// The output buffer is smaller than the packed data.
    BufferTooSmall {
        /// Bytes needed for the values being packed
        needed: usize,
        /// Bytes available after the offset
        available: usize,
    },

    /// The output buffer ran out while writing through [`Codec::pack_to_writer`].
    BufferFull,

    /// The input ended before the last field of the format.
    TruncatedInput,

    /// A varint in the input did not terminate within 10 bytes.
    MalformedVarint,

    /// The format needs more values than were supplied.
    MissingValue {
        /// Position of the first missing value
        index: usize,
        /// The directive that wanted it
        directive: Directive,
    },

    /// The value at `index` is not the type that `directive` packs.
    ValueMismatch {
        /// Position of the value
        index: usize,
        /// The directive it was matched against
        directive: Directive,
    },

    /// The value at `index` does not fit the configured width of `directive`.
    ValueOutOfRange {
        /// Position of the value
        index: usize,
        /// The directive it was matched against
        directive: Directive,
    },

    /// More values were supplied than the format consumes.
    ExcessValues {
        /// Number of values the format consumes
        expected: usize,
        /// Number of values supplied
        supplied: usize,
    },
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<ReaderError> for Error {
    fn from(e: ReaderError) -> Self {
        match e {
            ReaderError::NeedsMoreData => Self::TruncatedInput,
            ReaderError::Invalid => Self::MalformedVarint,
        }
    }
}

impl From<WriterError> for Error {
    fn from(e: WriterError) -> Self {
        match e {
            WriterError::BufferFull => Self::BufferFull,
        }
    }
}

/// Converts to an `io::Error`, so that `?` works in functions that read or write I/O streams.
/// Malformed formats and values map to `InvalidInput`, truncated or malformed input to
/// `InvalidData`, and output that does not fit to `WriteZero`.
#[cfg(feature = "std")]
impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;

        let kind = match e {
            Error::TruncatedInput | Error::MalformedVarint => ErrorKind::InvalidData,
            Error::BufferTooSmall { .. } | Error::BufferFull => ErrorKind::WriteZero,
            Error::Format(_)
            | Error::MissingValue { .. }
            | Error::ValueMismatch { .. }
            | Error::ValueOutOfRange { .. }
            | Error::ExcessValues { .. } => ErrorKind::InvalidInput,
        };
        std::io::Error::new(kind, e)
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Format(e) => e.fmt(f),
            Self::BufferTooSmall { needed, available } => write!(
                f,
                "The output buffer is too small: {needed} bytes needed, {available} available"
            ),
            Self::BufferFull => f.write_str("The output buffer is full"),
            Self::TruncatedInput => f.write_str("The input ended in the middle of a field"),
            Self::MalformedVarint => f.write_str("A varint did not terminate within 10 bytes"),
            Self::MissingValue { index, directive } => write!(
                f,
                "Missing value {index} for '{}'",
                directive.as_char()
            ),
            Self::ValueMismatch { index, directive } => write!(
                f,
                "Value {index} has the wrong type for '{}'",
                directive.as_char()
            ),
            Self::ValueOutOfRange { index, directive } => write!(
                f,
                "Value {index} is out of range for '{}'",
                directive.as_char()
            ),
            Self::ExcessValues { expected, supplied } => write!(
                f,
                "The format consumes {expected} values, but {supplied} were supplied"
            ),
        }
    }
}
