//! 256-bit word arithmetic
//!
//! Unsigned operations wrap modulo 2^256. Signed operations read the word as
//! a two's-complement integer. Division and modulo by zero yield zero.

use primitive_types::{U256, U512};

/// Word with the sign bit set
pub const SIGN_BIT: U256 = U256([0, 0, 0, 0x8000_0000_0000_0000]);

/// Check the sign bit
pub fn is_negative(value: &U256) -> bool {
    value.bit(255)
}

/// Two's-complement negation
pub fn twos_complement(value: U256) -> U256 {
    (!value).overflowing_add(U256::one()).0
}

/// A word split into sign and magnitude
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signed {
    /// Sign bit of the word
    pub negative: bool,
    /// Absolute value (2^255 for the minimum)
    pub magnitude: U256,
}

impl Signed {
    /// Read a word as a signed integer
    pub fn from_word(word: U256) -> Self {
        let negative = is_negative(&word);
        let magnitude = if negative { twos_complement(word) } else { word };
        Self { negative, magnitude }
    }

    /// Encode back into a word
    pub fn into_word(self) -> U256 {
        if self.negative {
            twos_complement(self.magnitude)
        } else {
            self.magnitude
        }
    }
}

/// Wrapping addition
pub fn add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

/// Wrapping subtraction
pub fn sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

/// Wrapping multiplication
pub fn mul(a: U256, b: U256) -> U256 {
    a.overflowing_mul(b).0
}

/// Unsigned division, zero divisor yields zero
pub fn div(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a / b
    }
}

/// Unsigned remainder, zero divisor yields zero
pub fn rem(a: U256, b: U256) -> U256 {
    if b.is_zero() {
        U256::zero()
    } else {
        a % b
    }
}

/// Signed division truncating toward zero.
///
/// `sdiv(-2^255, -1)` is `2^255`: the magnitude quotient is 2^255 and its
/// negation is itself.
pub fn sdiv(a: Signed, b: Signed) -> U256 {
    if b.magnitude.is_zero() {
        return U256::zero();
    }
    Signed {
        negative: a.negative != b.negative,
        magnitude: a.magnitude / b.magnitude,
    }
    .into_word()
}

/// Signed remainder, result takes the sign of the dividend
pub fn smod(a: Signed, b: Signed) -> U256 {
    if b.magnitude.is_zero() {
        return U256::zero();
    }
    Signed {
        negative: a.negative,
        magnitude: a.magnitude % b.magnitude,
    }
    .into_word()
}

fn low_u256(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_big_endian(&mut bytes);
    U256::from_big_endian(&bytes[32..])
}

/// `(a + b) % n` without intermediate overflow, zero modulus yields zero
pub fn addmod(a: U256, b: U256, n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    low_u256((U512::from(a) + U512::from(b)) % U512::from(n))
}

/// `(a * b) % n` without intermediate overflow, zero modulus yields zero
pub fn mulmod(a: U256, b: U256, n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    low_u256(a.full_mul(b) % U512::from(n))
}

/// `base ^ exponent` modulo 2^256, a zero base yields zero for any exponent
pub fn exp(base: U256, exponent: U256) -> U256 {
    if base.is_zero() || base == U256::one() {
        return base;
    }
    if exponent.is_zero() {
        return U256::one();
    }
    let mut result = U256::one();
    let mut base = base;
    let mut exponent = exponent;
    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = mul(result, base);
        }
        base = mul(base, base);
        exponent >>= 1;
    }
    result
}

/// Number of significant bytes in `value` (zero for zero)
pub fn byte_length(value: &U256) -> u64 {
    (value.bits() as u64 + 7) / 8
}

/// Extend the sign of the low `k + 1` bytes of `x`; `k >= 31` leaves `x` unchanged
pub fn signextend(k: U256, x: U256) -> U256 {
    if k >= U256::from(31) {
        return x;
    }
    let bit = k.low_u64() as usize * 8 + 7;
    let mask = (U256::one() << (bit + 1)) - U256::one();
    if x.bit(bit) {
        x | !mask
    } else {
        x & mask
    }
}

/// Byte `i` of `x` counting from the most significant end; `i >= 32` yields zero
pub fn byte(i: U256, x: U256) -> U256 {
    if i >= U256::from(32) {
        return U256::zero();
    }
    let shift = (31 - i.low_u64() as usize) * 8;
    (x >> shift) & U256::from(0xff)
}

/// Signed less-than
pub fn slt(a: &U256, b: &U256) -> bool {
    match (is_negative(a), is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        _ => a < b,
    }
}

/// Signed greater-than
pub fn sgt(a: &U256, b: &U256) -> bool {
    slt(b, a)
}

/// Numeric value of big-endian bytes; only the trailing 32 bytes count
pub fn from_bytes(bytes: &[u8]) -> U256 {
    U256::from_big_endian(&bytes[bytes.len().saturating_sub(32)..])
}

/// 32-byte big-endian encoding
pub fn to_word_bytes(value: &U256) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Big-endian encoding without leading zero bytes (empty for zero)
pub fn to_trimmed_bytes(value: &U256) -> Vec<u8> {
    let bytes = to_word_bytes(value);
    let skip = 32 - byte_length(value) as usize;
    bytes[skip..].to_vec()
}

/// `value` as `u64`, if it fits
pub fn to_u64(value: &U256) -> Option<u64> {
    (value.bits() <= 64).then(|| value.low_u64())
}

/// `value` as `usize`, if it fits
pub fn to_usize(value: &U256) -> Option<usize> {
    to_u64(value).and_then(|v| usize::try_from(v).ok())
}

/// Convert a boolean to 1 or 0
pub fn from_bool(flag: bool) -> U256 {
    if flag {
        U256::one()
    } else {
        U256::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn neg(n: u64) -> U256 {
        twos_complement(U256::from(n))
    }

    fn signed(word: U256) -> Signed {
        Signed::from_word(word)
    }

    #[test]
    fn test_sdiv_signs() {
        assert_eq!(sdiv(signed(U256::from(10)), signed(neg(2))), neg(5));
        assert_eq!(sdiv(signed(neg(10)), signed(neg(2))), U256::from(5));
        assert_eq!(sdiv(signed(neg(7)), signed(U256::from(2))), neg(3));
    }

    #[test]
    fn test_sdiv_min_by_minus_one() {
        assert_eq!(sdiv(signed(SIGN_BIT), signed(U256::MAX)), SIGN_BIT);
    }

    #[test]
    fn test_smod_takes_dividend_sign() {
        assert_eq!(smod(signed(neg(8)), signed(U256::from(3))), neg(2));
        assert_eq!(smod(signed(U256::from(8)), signed(neg(3))), U256::from(2));
    }

    #[test]
    fn test_addmod_mulmod_no_overflow() {
        let n = U256::from(7);
        assert_eq!(addmod(U256::MAX, U256::MAX, n), (U256::MAX % n + U256::MAX % n) % n);
        // (2^256 - 1)^2 mod 12 = 9
        assert_eq!(mulmod(U256::MAX, U256::MAX, U256::from(12)), U256::from(9));
        assert_eq!(addmod(U256::one(), U256::one(), U256::zero()), U256::zero());
        assert_eq!(mulmod(U256::one(), U256::one(), U256::zero()), U256::zero());
    }

    #[test]
    fn test_exp() {
        assert_eq!(exp(U256::from(2), U256::from(10)), U256::from(1024));
        assert_eq!(exp(U256::from(2), U256::from(256)), U256::zero());
        assert_eq!(exp(U256::zero(), U256::from(5)), U256::zero());
        assert_eq!(exp(U256::one(), U256::MAX), U256::one());
        assert_eq!(exp(U256::zero(), U256::zero()), U256::zero());
        assert_eq!(exp(U256::from(7), U256::zero()), U256::one());
        assert_eq!(exp(U256::MAX, U256::from(2)), U256::one());
    }

    #[test]
    fn test_byte_length() {
        assert_eq!(byte_length(&U256::zero()), 0);
        assert_eq!(byte_length(&U256::from(0xff)), 1);
        assert_eq!(byte_length(&U256::from(0x100)), 2);
        assert_eq!(byte_length(&U256::MAX), 32);
    }

    #[test]
    fn test_signextend() {
        assert_eq!(signextend(U256::zero(), U256::from(0xff)), U256::MAX);
        assert_eq!(signextend(U256::zero(), U256::from(0x7f)), U256::from(0x7f));
        assert_eq!(signextend(U256::one(), U256::from(0x12_80ff)), neg(0x7f01));
        assert_eq!(signextend(U256::from(31), U256::from(0xff)), U256::from(0xff));
        assert_eq!(signextend(U256::MAX, U256::from(0xff)), U256::from(0xff));
    }

    #[test]
    fn test_byte() {
        let x = U256::from_big_endian(&[0xab; 32]);
        assert_eq!(byte(U256::zero(), x), U256::from(0xab));
        assert_eq!(byte(U256::from(31), U256::from(0x1234)), U256::from(0x34));
        assert_eq!(byte(U256::from(30), U256::from(0x1234)), U256::from(0x12));
        assert_eq!(byte(U256::from(32), x), U256::zero());
    }

    #[test]
    fn test_signed_compare() {
        assert!(slt(&neg(1), &U256::one()));
        assert!(!slt(&U256::one(), &neg(1)));
        assert!(slt(&neg(2), &neg(1)));
        assert!(sgt(&U256::zero(), &neg(1)));
    }

    #[test]
    fn test_byte_conversions() {
        assert!(to_trimmed_bytes(&U256::zero()).is_empty());
        assert_eq!(to_trimmed_bytes(&U256::from(0x0102)), vec![0x01, 0x02]);
        assert_eq!(from_bytes(&[0x01, 0x02]), U256::from(0x0102));
        let mut long = vec![0xff; 8];
        long.extend_from_slice(&[0u8; 31]);
        long.push(7);
        assert_eq!(from_bytes(&long), U256::from(7));
    }

    proptest! {
        #[test]
        fn prop_add_sub_inverse(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let (a, b) = (U256(a), U256(b));
            prop_assert_eq!(sub(add(a, b), b), a);
        }

        #[test]
        fn prop_add_matches_u512(a in any::<[u64; 4]>(), b in any::<[u64; 4]>()) {
            let (a, b) = (U256(a), U256(b));
            let wide = (U512::from(a) + U512::from(b)) % (U512::one() << 256);
            prop_assert_eq!(add(a, b), low_u256(wide));
        }

        #[test]
        fn prop_division_by_zero_is_zero(a in any::<[u64; 4]>()) {
            let a = U256(a);
            prop_assert_eq!(div(a, U256::zero()), U256::zero());
            prop_assert_eq!(rem(a, U256::zero()), U256::zero());
            prop_assert_eq!(sdiv(signed(a), signed(U256::zero())), U256::zero());
            prop_assert_eq!(smod(signed(a), signed(U256::zero())), U256::zero());
        }

        #[test]
        fn prop_signed_roundtrip(a in any::<[u64; 4]>()) {
            let a = U256(a);
            prop_assert_eq!(Signed::from_word(a).into_word(), a);
        }

        #[test]
        fn prop_trimmed_roundtrip(a in any::<[u64; 4]>()) {
            let a = U256(a);
            prop_assert_eq!(from_bytes(&to_trimmed_bytes(&a)), a);
        }
    }
}
