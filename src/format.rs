//! Format strings.
//!
//! A format string is read left to right as a sequence of tokens:
//!
//! ```text
//! format        := (endian_marker | digit+ directive | directive)*
//! endian_marker := '=' | '<' | '>' | '!'
//! directive     := 'b' | 'B' | 'h' | 'H' | 'i' | 'I' | 'l' | 'L' | 'q' | 'Q'
//!                | 'f' | 'd' | 's' | 'p' | 'x' | 'v' | 'V'
//! ```
//!
//! Digits accumulate into a repeat count for the directive that follows them. An endianness
//! marker discards a pending repeat count, as does the end of the string.

use crate::endian::Endian;
use crate::varint::MAX_VARINT_LEN;

/// Encoded width of the `i` and `I` directives.
///
/// `l` and `L` are always 32 bits wide. `i` and `I` follow the width of C's `int` on the
/// target by default, which is 32 bits everywhere except 16-bit targets.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum IntWidth {
    /// 2 bytes
    Sixteen,
    /// 4 bytes
    ThirtyTwo,
}

impl IntWidth {
    /// The width of C's `int` on the target.
    pub const NATIVE: Self = if core::mem::size_of::<core::ffi::c_int>() == 2 {
        Self::Sixteen
    } else {
        Self::ThirtyTwo
    };

    /// Size in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Sixteen => 2,
            Self::ThirtyTwo => 4,
        }
    }
}

impl Default for IntWidth {
    fn default() -> Self {
        Self::NATIVE
    }
}

/// A type directive: one format character that selects a value type and its encoding.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Directive {
    /// `b`: `i8`, copied as-is.
    SignedByte,
    /// `B`: `u8`, copied as-is.
    Byte,
    /// `h`: `i16`
    Short,
    /// `H`: `u16`
    UShort,
    /// `i`: `i32`, encoded with the configured [`IntWidth`].
    Int,
    /// `I`: `u32`, encoded with the configured [`IntWidth`].
    UInt,
    /// `l`: `i32`, always 4 bytes.
    Long,
    /// `L`: `u32`, always 4 bytes.
    ULong,
    /// `q`: `i64`
    LongLong,
    /// `Q`: `u64`
    ULongLong,
    /// `f`: IEEE-754 binary32.
    Float,
    /// `d`: IEEE-754 binary64.
    Double,
    /// `s` or `p`: a single raw byte.
    ///
    /// A repeat count moves that many separate bytes, each one its own value. This is not a
    /// length-prefixed or fixed-length string field.
    Char,
    /// `x`: a zero byte when packing, a skipped byte when unpacking. Consumes no value.
    Pad,
    /// `v`: `i64` as a signed varint.
    VarInt,
    /// `V`: `u64` as an unsigned varint.
    UVarInt,
}

impl Directive {
    /// Maps a format character to its directive.
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' => Self::SignedByte,
            'B' => Self::Byte,
            'h' => Self::Short,
            'H' => Self::UShort,
            'i' => Self::Int,
            'I' => Self::UInt,
            'l' => Self::Long,
            'L' => Self::ULong,
            'q' => Self::LongLong,
            'Q' => Self::ULongLong,
            'f' => Self::Float,
            'd' => Self::Double,
            's' | 'p' => Self::Char,
            'x' => Self::Pad,
            'v' => Self::VarInt,
            'V' => Self::UVarInt,
            _ => return None,
        })
    }

    /// The canonical format character for this directive.
    pub const fn as_char(self) -> char {
        match self {
            Self::SignedByte => 'b',
            Self::Byte => 'B',
            Self::Short => 'h',
            Self::UShort => 'H',
            Self::Int => 'i',
            Self::UInt => 'I',
            Self::Long => 'l',
            Self::ULong => 'L',
            Self::LongLong => 'q',
            Self::ULongLong => 'Q',
            Self::Float => 'f',
            Self::Double => 'd',
            Self::Char => 's',
            Self::Pad => 'x',
            Self::VarInt => 'v',
            Self::UVarInt => 'V',
        }
    }

    /// Returns `true` if each repetition of this directive consumes or produces a value.
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Pad)
    }

    /// In-memory size of the value this directive consumes or produces.
    pub const fn native_size(self, int_width: IntWidth) -> usize {
        match self {
            Self::SignedByte | Self::Byte | Self::Char => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt => int_width.bytes(),
            Self::Long | Self::ULong | Self::Float => 4,
            Self::LongLong | Self::ULongLong | Self::Double => 8,
            Self::VarInt | Self::UVarInt => 8,
            Self::Pad => 0,
        }
    }

    /// Encoded size of one repetition. For varints this is the worst case; the actual size
    /// depends on the value.
    pub const fn max_encoded_size(self, int_width: IntWidth) -> usize {
        match self {
            Self::SignedByte | Self::Byte | Self::Char | Self::Pad => 1,
            Self::Short | Self::UShort => 2,
            Self::Int | Self::UInt => int_width.bytes(),
            Self::Long | Self::ULong | Self::Float => 4,
            Self::LongLong | Self::ULongLong | Self::Double => 8,
            Self::VarInt | Self::UVarInt => MAX_VARINT_LEN,
        }
    }
}

/// One unit of a format string.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Token {
    /// An endianness marker. It applies to every directive that follows, until the next marker.
    Endian(Endian),
    /// A directive and the number of times it repeats. `count` is 1 when no digits preceded
    /// the directive.
    ///
    /// An explicit count of zero, as in `"0h"`, means zero repetitions: the field consumes no
    /// value and no bytes. This matches Python's `struct`; C `struct_pack` ports that test the
    /// count after running the field once encode such a field a single time.
    Field {
        /// The directive
        directive: Directive,
        /// Number of repetitions
        count: usize,
    },
}

/// Error type for format strings.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FormatError {
    /// The character at byte offset `position` is not a directive, an endianness marker or a
    /// digit.
    UnknownDirective {
        /// Byte offset into the format string
        position: usize,
        /// The offending character
        found: char,
    },

    /// The repeat count ending at byte offset `position` does not fit in `usize`.
    RepeatOverflow {
        /// Byte offset into the format string
        position: usize,
    },

    /// The total size described by the format does not fit in `usize`.
    SizeOverflow,
}

impl core::error::Error for FormatError {}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownDirective { position, found } => {
                write!(f, "Unknown format character {found:?} at offset {position}")
            }
            Self::RepeatOverflow { position } => {
                write!(f, "Repeat count at offset {position} is too large")
            }
            Self::SizeOverflow => f.write_str("The format describes too many bytes"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum State {
    Idle,
    Accumulating(usize),
}

/// Iterator over the tokens of a format string.
///
/// Yields `Err` at the first malformed character, and nothing after that.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    chars: core::str::CharIndices<'a>,
    state: State,
    failed: bool,
}

impl<'a> Tokens<'a> {
    /// Starts tokenizing `format`.
    pub fn new(format: &'a str) -> Self {
        Self {
            chars: format.char_indices(),
            state: State::Idle,
            failed: false,
        }
    }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        for (position, c) in self.chars.by_ref() {
            if let Some(digit) = c.to_digit(10) {
                let pending = match self.state {
                    State::Idle => 0,
                    State::Accumulating(n) => n,
                };
                let Some(count) = pending
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit as usize))
                else {
                    self.failed = true;
                    return Some(Err(FormatError::RepeatOverflow { position }));
                };
                self.state = State::Accumulating(count);
                continue;
            }

            let pending = core::mem::replace(&mut self.state, State::Idle);

            if let Some(endian) = u8::try_from(c).ok().and_then(Endian::from_marker) {
                return Some(Ok(Token::Endian(endian)));
            }

            let Some(directive) = Directive::from_char(c) else {
                self.failed = true;
                return Some(Err(FormatError::UnknownDirective { position, found: c }));
            };

            let count = match pending {
                State::Idle => 1,
                State::Accumulating(n) => n,
            };
            return Some(Ok(Token::Field { directive, count }));
        }

        None
    }
}

impl core::iter::FusedIterator for Tokens<'_> {}

/// A format string that has been checked to be well-formed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Format<'a> {
    source: &'a str,
}

impl<'a> Format<'a> {
    /// Checks that every character of `source` is a directive, an endianness marker or a digit,
    /// and that every repeat count fits in `usize`.
    pub fn parse(source: &'a str) -> Result<Self, FormatError> {
        for token in Tokens::new(source) {
            token?;
        }
        Ok(Self { source })
    }

    /// Iterates the tokens of the format. Because the format has been validated, every item
    /// is `Ok`.
    pub fn tokens(&self) -> Tokens<'a> {
        Tokens::new(self.source)
    }

    /// Iterates the fields of the format, each paired with the endianness selector in effect
    /// for it.
    pub fn fields(&self) -> impl Iterator<Item = (Endian, Directive, usize)> + 'a {
        let mut endian = Endian::Native;
        self.tokens()
            .filter_map(Result::ok)
            .filter_map(move |token| match token {
                Token::Endian(e) => {
                    endian = e;
                    None
                }
                Token::Field { directive, count } => Some((endian, directive, count)),
            })
    }

    /// Number of values the format consumes when packing, or produces when unpacking.
    pub fn value_count(&self) -> Result<usize, FormatError> {
        self.fields()
            .filter(|(_, directive, _)| directive.takes_value())
            .try_fold(0usize, |total, (_, _, count)| {
                total.checked_add(count).ok_or(FormatError::SizeOverflow)
            })
    }
}

impl core::fmt::Display for Format<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.source)
    }
}
