//! Arbitrary-precision rendering for bignum (tags 2/3), decimal-fraction (tag 4) and
//! bigfloat (tag 5) items.
//!
//! Arbitrary-precision arithmetic itself stays out of scope; this module is the narrow,
//! self-contained renderer needed to produce the `String` events tags 2-5 demand: mantissa
//! and exponent tracked separately from an unsigned magnitude, generalised from a fixed-width
//! integer to arbitrary byte magnitudes.

/// An arbitrary-precision unsigned magnitude, most-significant byte first, with leading
/// zero bytes already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Magnitude(Vec<u8>);

impl Magnitude {
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let first_nonzero = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Magnitude(bytes[first_nonzero..].to_vec())
    }

    pub fn from_u64(v: u64) -> Self {
        Self::from_be_bytes(&v.to_be_bytes())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as an unsigned decimal digit string via repeated divide-by-10.
    pub fn to_decimal_digits(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        let mut work = self.0.clone();
        while !work.iter().all(|&b| b == 0) {
            let mut remainder: u32 = 0;
            for byte in work.iter_mut() {
                let acc = (remainder << 8) | (*byte as u32);
                *byte = (acc / 10) as u8;
                remainder = acc % 10;
            }
            digits.push(std::char::from_digit(remainder, 10).unwrap());
            // drop leading zero bytes so the loop terminates promptly
            while work.first() == Some(&0) && work.len() > 1 {
                work.remove(0);
            }
        }
        digits.iter().rev().collect()
    }

    /// Add one, with carry propagation, to the magnitude: the `tag 3` negative-bignum and
    /// negative-fixnum encodings both express `value = -1 - n`, so callers render `n + 1`.
    pub fn increment(&self) -> Magnitude {
        let mut out = self.0.clone();
        let mut carry = 1u16;
        for byte in out.iter_mut().rev() {
            let sum = *byte as u16 + carry;
            *byte = sum as u8;
            carry = sum >> 8;
            if carry == 0 {
                break;
            }
        }
        if carry > 0 {
            out.insert(0, carry as u8);
        }
        Magnitude::from_be_bytes(&out)
    }

    /// Narrow to a signed `i128`, for exponents and other small integers. `None` if the
    /// magnitude (with `negative` applied) does not fit.
    pub fn to_i128(&self, negative: bool) -> Option<i128> {
        if self.0.len() > 16 {
            return None;
        }
        let mut v: u128 = 0;
        for byte in &self.0 {
            v = (v << 8) | (*byte as u128);
        }
        if negative {
            if v > (i128::MAX as u128) + 1 {
                return None;
            }
            Some(-(v as i128))
        } else {
            if v > i128::MAX as u128 {
                return None;
            }
            Some(v as i128)
        }
    }

    /// Render as a hexadecimal digit string (no `0x` prefix, no leading zeros).
    pub fn to_hex_digits(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut s = String::with_capacity(self.0.len() * 2);
        for (i, byte) in self.0.iter().enumerate() {
            if i == 0 {
                s.push_str(&format!("{:x}", byte));
            } else {
                s.push_str(&format!("{:02x}", byte));
            }
        }
        s
    }
}

/// Render `magnitude * 10^exponent`, with `negative` applied as a leading `-`, as an exact
/// decimal string (no floating-point rounding).
pub fn decimal_fraction_to_string(magnitude: &Magnitude, exponent: i128, negative: bool) -> String {
    let digits = magnitude.to_decimal_digits();
    let body = if exponent >= 0 {
        let zeros = "0".repeat(exponent as usize);
        format!("{}{}", digits, zeros)
    } else {
        let shift = (-exponent) as usize;
        if digits.len() > shift {
            let split = digits.len() - shift;
            format!("{}.{}", &digits[..split], &digits[split..])
        } else {
            let pad = shift - digits.len();
            format!("0.{}{}", "0".repeat(pad), digits)
        }
    };
    if negative && body != "0" {
        format!("-{}", body)
    } else {
        body
    }
}

/// Render `magnitude * 2^exponent` as a C99-style hex-float string: `[-]0x<hex>p<exp>`.
pub fn bigfloat_to_hex_string(magnitude: &Magnitude, exponent: i128, negative: bool) -> String {
    let hex = magnitude.to_hex_digits();
    let sign = if negative && hex != "0" { "-" } else { "" };
    format!("{}0x{}p{:+}", sign, hex, exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_strips_leading_zero_bytes() {
        let m = Magnitude::from_be_bytes(&[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(m.to_decimal_digits(), "65536");
    }

    #[test]
    fn zero_magnitude_renders_zero() {
        let m = Magnitude::from_be_bytes(&[]);
        assert!(m.is_zero());
        assert_eq!(m.to_decimal_digits(), "0");
    }

    #[test]
    fn decimal_fraction_with_negative_exponent() {
        // 3 * 10^-1 == "0.3"
        let m = Magnitude::from_u64(3);
        assert_eq!(decimal_fraction_to_string(&m, -1, false), "0.3");
    }

    #[test]
    fn decimal_fraction_with_positive_exponent() {
        let m = Magnitude::from_u64(3);
        assert_eq!(decimal_fraction_to_string(&m, 2, false), "300");
    }

    #[test]
    fn decimal_fraction_pads_zeroes_when_shift_exceeds_digits() {
        let m = Magnitude::from_u64(3);
        assert_eq!(decimal_fraction_to_string(&m, -3, false), "0.003");
    }

    #[test]
    fn negative_decimal_fraction_has_leading_minus() {
        let m = Magnitude::from_u64(3);
        assert_eq!(decimal_fraction_to_string(&m, -1, true), "-0.3");
    }

    #[test]
    fn bigint_decimal_matches_known_value() {
        // big-endian bytes 01 00 00 == 65536
        let m = Magnitude::from_be_bytes(&[0x01, 0x00, 0x00]);
        assert_eq!(m.to_decimal_digits(), "65536");
    }

    #[test]
    fn increment_propagates_carry() {
        let m = Magnitude::from_be_bytes(&[0x00, 0xff]);
        assert_eq!(m.increment().to_decimal_digits(), "256");
    }

    #[test]
    fn to_i128_roundtrips_small_values() {
        let m = Magnitude::from_u64(41);
        assert_eq!(m.to_i128(false), Some(41));
        assert_eq!(m.to_i128(true), Some(-41));
    }

    #[test]
    fn bigfloat_hex_rendering() {
        let m = Magnitude::from_u64(3);
        assert_eq!(bigfloat_to_hex_string(&m, -1, false), "0x3p-1");
    }
}
