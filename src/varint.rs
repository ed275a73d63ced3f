//! Base-128 variable-length integers.
//!
//! Each byte carries 7 bits of the value, least-significant group first. The high bit of a
//! byte is set when more bytes follow. A `u64` needs at most 10 bytes.
//!
//! Signed values are mapped onto unsigned ones first, so that values of small magnitude stay
//! short regardless of sign: `0, -1, 1, -2, 2, ...` map to `0, 1, 2, 3, 4, ...`.

/// Bit indicating that more bytes follow.
pub const MORE: u8 = 0x80;

/// The largest number of bytes a varint occupies.
pub const MAX_VARINT_LEN: usize = 10;

/// Maps a signed value onto an unsigned one.
///
/// The value is shifted left by one and, if it was negative, complemented. For two's
/// complement inputs this matches the usual `(n << 1) ^ (n >> 63)` mapping.
#[inline(always)]
pub const fn zigzag_encode(value: i64) -> u64 {
    let shifted = (value as u64) << 1;
    if value < 0 {
        !shifted
    } else {
        shifted
    }
}

/// Reverses [`zigzag_encode`].
#[inline(always)]
pub const fn zigzag_decode(value: u64) -> i64 {
    let shifted = (value >> 1) as i64;
    if value & 1 != 0 {
        !shifted
    } else {
        shifted
    }
}

/// Returns the number of bytes needed to encode `value`.
pub const fn encoded_len(value: u64) -> usize {
    let significant_bits = 64 - (value | 1).leading_zeros() as usize;
    significant_bits.div_ceil(7)
}

/// Returns the number of bytes needed to encode the signed `value`.
pub const fn signed_encoded_len(value: i64) -> usize {
    encoded_len(zigzag_encode(value))
}
