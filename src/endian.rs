/// A concrete byte order, as used on the wire or by the host.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ByteOrder {
    /// Least-significant byte first.
    Little,
    /// Most-significant byte first. Also known as network order.
    Big,
}

/// The byte order selected by an endianness marker in a format string.
///
/// `Native` is resolved against the host order held by the [`Codec`](crate::Codec) at the
/// moment a field is encoded, so the same format string may produce different bytes on
/// different hosts.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum Endian {
    /// `=`, the order of the host. This is the selector in effect at the start of every format.
    #[default]
    Native,
    /// `<`
    Little,
    /// `>` and `!`
    Big,
}

impl Endian {
    /// Maps a format character to an endianness selector, if it is a marker.
    pub const fn from_marker(c: u8) -> Option<Self> {
        match c {
            b'=' => Some(Self::Native),
            b'<' => Some(Self::Little),
            b'>' | b'!' => Some(Self::Big),
            _ => None,
        }
    }

    /// Resolves `Native` to the given host order.
    #[inline(always)]
    pub const fn resolve(self, native: ByteOrder) -> ByteOrder {
        match self {
            Self::Native => native,
            Self::Little => ByteOrder::Little,
            Self::Big => ByteOrder::Big,
        }
    }
}

/// Determines the byte order of the host by looking at the in-memory layout of a known
/// multi-byte value.
///
/// This is a `const fn`; [`NATIVE_ENDIAN`] holds its result, evaluated at compile time, so
/// there is no lazily-initialized global to race on.
pub const fn native_endian() -> ByteOrder {
    let probe = u32::from_ne_bytes([0x01, 0x02, 0x03, 0x04]);
    if probe == 0x0403_0201 {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    }
}

/// The byte order of the host.
pub const NATIVE_ENDIAN: ByteOrder = native_endian();
