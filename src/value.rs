use crate::format::Directive;

/// A value consumed by [`pack`](crate::pack) or produced by [`unpack`](crate::unpack).
///
/// Each value-taking directive accepts exactly one variant:
///
/// | Directive | Variant |
/// |---|---|
/// | `b` | `I8` |
/// | `B` | `U8` |
/// | `h` | `I16` |
/// | `H` | `U16` |
/// | `i`, `l` | `I32` |
/// | `I`, `L` | `U32` |
/// | `q` | `I64` |
/// | `Q` | `U64` |
/// | `f` | `F32` |
/// | `d` | `F64` |
/// | `s`, `p` | `Char` |
/// | `v` | `VarInt` |
/// | `V` | `UVarInt` |
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Value {
    /// `b`
    I8(i8),
    /// `B`
    U8(u8),
    /// `h`
    I16(i16),
    /// `H`
    U16(u16),
    /// `i` and `l`
    I32(i32),
    /// `I` and `L`
    U32(u32),
    /// `q`
    I64(i64),
    /// `Q`
    U64(u64),
    /// `f`
    F32(f32),
    /// `d`
    F64(f64),
    /// `s` and `p`
    Char(u8),
    /// `v`
    VarInt(i64),
    /// `V`
    UVarInt(u64),
}

impl Value {
    /// Returns `true` if this value can be packed by `directive`.
    pub fn matches(&self, directive: Directive) -> bool {
        matches!(
            (directive, self),
            (Directive::SignedByte, Self::I8(_))
                | (Directive::Byte, Self::U8(_))
                | (Directive::Short, Self::I16(_))
                | (Directive::UShort, Self::U16(_))
                | (Directive::Int | Directive::Long, Self::I32(_))
                | (Directive::UInt | Directive::ULong, Self::U32(_))
                | (Directive::LongLong, Self::I64(_))
                | (Directive::ULongLong, Self::U64(_))
                | (Directive::Float, Self::F32(_))
                | (Directive::Double, Self::F64(_))
                | (Directive::Char, Self::Char(_))
                | (Directive::VarInt, Self::VarInt(_))
                | (Directive::UVarInt, Self::UVarInt(_))
        )
    }

    /// Returns the value as an `i128` if it is an integer of any width, including bytes and
    /// varints.
    pub fn as_integer(&self) -> Option<i128> {
        Some(match *self {
            Self::I8(n) => n.into(),
            Self::U8(n) | Self::Char(n) => n.into(),
            Self::I16(n) => n.into(),
            Self::U16(n) => n.into(),
            Self::I32(n) => n.into(),
            Self::U32(n) => n.into(),
            Self::I64(n) | Self::VarInt(n) => n.into(),
            Self::U64(n) | Self::UVarInt(n) => n.into(),
            Self::F32(_) | Self::F64(_) => return None,
        })
    }

    /// Returns the value as an `f64` if it is a floating-point value.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::F32(x) => Some(x.into()),
            Self::F64(x) => Some(x),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident,)*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}
