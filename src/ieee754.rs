//! Bit-level IEEE-754 encoding and decoding of `f32` and `f64` values.
//!
//! The encoder works arithmetically rather than by reinterpreting the in-memory bits of the
//! value: it normalizes the magnitude into `[1.0, 2.0)` by repeated halving or doubling,
//! counting the steps as the exponent, and quantizes the remaining fraction into the
//! significand field. Halving and doubling are exact in binary floating point, so the result
//! does not depend on the host's math library.
//!
//! Special values always encode to fixed patterns:
//!
//! | Value     | `f32`        | `f64`                |
//! |-----------|--------------|----------------------|
//! | `+inf`    | `0x7f800000` | `0x7ff0000000000000` |
//! | `-inf`    | `0xff800000` | `0xfff0000000000000` |
//! | NaN       | `0x7fc00000` | `0x7ff8000000000000` |
//! | `±0.0`    | `0x00000000` | `0x0000000000000000` |
//!
//! Negative zero is not preserved; it encodes as positive zero.

/// Field widths of a binary interchange format.
struct Layout {
    bits: u32,
    exp_bits: u32,
}

const BINARY32: Layout = Layout {
    bits: 32,
    exp_bits: 8,
};

const BINARY64: Layout = Layout {
    bits: 64,
    exp_bits: 11,
};

impl Layout {
    const fn significand_bits(&self) -> u32 {
        self.bits - self.exp_bits - 1
    }

    const fn bias(&self) -> i32 {
        (1 << (self.exp_bits - 1)) - 1
    }

    /// All-ones exponent field, which marks infinities and NaNs.
    const fn max_exp(&self) -> u64 {
        (1 << self.exp_bits) - 1
    }

    const fn sign_bit(&self) -> u64 {
        1 << (self.bits - 1)
    }

    const fn infinity(&self) -> u64 {
        self.max_exp() << self.significand_bits()
    }

    const fn quiet_nan(&self) -> u64 {
        self.infinity() | (1 << (self.significand_bits() - 1))
    }

    fn encode(&self, value: f64) -> u64 {
        if value.is_nan() {
            return self.quiet_nan();
        }
        if value.is_infinite() {
            return if value > 0.0 {
                self.infinity()
            } else {
                self.sign_bit() | self.infinity()
            };
        }
        if value == 0.0 {
            return 0;
        }

        let (sign, mut norm) = if value < 0.0 {
            (self.sign_bit(), -value)
        } else {
            (0, value)
        };

        let mut shift: i32 = 0;
        while norm >= 2.0 {
            norm /= 2.0;
            shift += 1;
        }
        while norm < 1.0 {
            norm *= 2.0;
            shift -= 1;
        }

        // `norm - 1.0` is exact, and scaling it keeps the product below 2^significand_bits,
        // where adding 0.5 is still exact. Truncating then rounds half up.
        let sig_bits = self.significand_bits();
        let scale = (1u64 << sig_bits) as f64;
        let mut significand = ((norm - 1.0) * scale + 0.5) as u64;
        if significand >> sig_bits != 0 {
            significand = 0;
            shift += 1;
        }

        let biased = shift + self.bias();
        if biased >= self.max_exp() as i32 {
            return sign | self.infinity();
        }

        if biased <= 0 {
            // Subnormal: the exponent field is zero and the implicit leading bit moves into
            // the significand. A carry out of the significand lands in the exponent field,
            // which yields the smallest normal value.
            let full = (1u64 << sig_bits) | significand;
            let significand = round_shift_right(full, (1 - biased) as u32);
            return sign | significand;
        }

        sign | ((biased as u64) << sig_bits) | significand
    }

    fn decode(&self, bits: u64) -> f64 {
        let sig_bits = self.significand_bits();
        let significand = bits & ((1u64 << sig_bits) - 1);
        let exp = (bits >> sig_bits) & self.max_exp();
        let negative = bits & self.sign_bit() != 0;

        if bits & !self.sign_bit() == 0 {
            return 0.0;
        }

        if exp == self.max_exp() {
            return match (significand, negative) {
                (0, false) => f64::INFINITY,
                (0, true) => f64::NEG_INFINITY,
                _ => f64::NAN,
            };
        }

        let scale = (1u64 << sig_bits) as f64;
        let (mut result, mut shift) = if exp == 0 {
            (significand as f64 / scale, 1 - self.bias())
        } else {
            (significand as f64 / scale + 1.0, exp as i32 - self.bias())
        };

        while shift > 0 {
            result *= 2.0;
            shift -= 1;
        }
        while shift < 0 {
            result /= 2.0;
            shift += 1;
        }

        if negative {
            -result
        } else {
            result
        }
    }
}

fn round_shift_right(value: u64, n: u32) -> u64 {
    match n {
        0 => value,
        1..=63 => (value + (1 << (n - 1))) >> n,
        _ => 0,
    }
}

/// Encodes an `f32` as its IEEE-754 binary32 bit pattern.
pub fn pack_f32(value: f32) -> u32 {
    BINARY32.encode(value as f64) as u32
}

/// Encodes an `f64` as its IEEE-754 binary64 bit pattern.
pub fn pack_f64(value: f64) -> u64 {
    BINARY64.encode(value)
}

/// Decodes an IEEE-754 binary32 bit pattern.
///
/// Any NaN pattern decodes to a NaN; the payload is not preserved.
pub fn unpack_f32(bits: u32) -> f32 {
    BINARY32.decode(bits as u64) as f32
}

/// Decodes an IEEE-754 binary64 bit pattern.
///
/// Any NaN pattern decodes to a NaN; the payload is not preserved.
pub fn unpack_f64(bits: u64) -> f64 {
    BINARY64.decode(bits)
}
