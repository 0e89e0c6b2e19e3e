// Integer records: SMALL_INTEGER_EXT, INTEGER_EXT, SMALL_BIG_EXT, LARGE_BIG_EXT.
//
// Bignum magnitudes are little-endian base-256 digit strings. Up to eight
// digits are folded into a native u64; the ninth digit promotes the
// accumulator to a BigUint seeded with the native value and the rest of
// the digits are appended to it. A promoted result is always `BigInt`,
// even when the final magnitude would fit in 64 bits.

use num_bigint::{BigInt, BigUint, Sign};

use super::cursor::{ByteSource, expect_tag};
use super::decoder::DecodeError;
use super::tag::{INTEGER_EXT, LARGE_BIG_EXT, SMALL_BIG_EXT, SMALL_INTEGER_EXT};
use crate::term::Term;

/// Digits that fit the native accumulator.
const NATIVE_DIGITS: u32 = 8;

/// Upper bound on the up-front digit buffer; the length field is untrusted.
const MAX_PREALLOC_DIGITS: usize = 64 * 1024;

/// `97, u8`: unsigned 0..=255.
pub fn decode_small_integer(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, SMALL_INTEGER_EXT)?;
    Ok(Term::Int64(i64::from(src.read_byte()?)))
}

/// `98, i32`: big-endian two's complement.
pub fn decode_integer(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, INTEGER_EXT)?;
    let value = src.read_u32_be()? as i32;
    Ok(Term::Int64(i64::from(value)))
}

/// `110, n: u8, sign: u8, digits[n]`.
pub fn decode_small_big(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, SMALL_BIG_EXT)?;
    let digits = u32::from(src.read_byte()?);
    read_bignum(src, digits)
}

/// `111, n: u32, sign: u8, digits[n]`.
pub fn decode_large_big(src: &mut dyn ByteSource) -> Result<Term, DecodeError> {
    expect_tag(src, LARGE_BIG_EXT)?;
    let digits = src.read_u32_be()?;
    read_bignum(src, digits)
}

// ---------------------------------------------------------------------------
// Bignum body
// ---------------------------------------------------------------------------

/// Read the sign byte and `digits` magnitude bytes.
fn read_bignum(src: &mut dyn ByteSource, digits: u32) -> Result<Term, DecodeError> {
    let negative = src.read_byte()? != 0;

    let mut native: u64 = 0;
    for i in 0..digits.min(NATIVE_DIGITS) {
        native |= u64::from(src.read_byte()?) << (8 * i);
    }

    if digits <= NATIVE_DIGITS {
        return Ok(narrow(negative, native));
    }

    // Promotion: seed with the eight native digits, then append the rest.
    let mut le = Vec::with_capacity((digits as usize).min(MAX_PREALLOC_DIGITS));
    le.extend_from_slice(&native.to_le_bytes());
    for _ in NATIVE_DIGITS..digits {
        le.push(src.read_byte()?);
    }
    let magnitude = BigUint::from_bytes_le(&le);
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(Term::BigInt(BigInt::from_biguint(sign, magnitude)))
}

/// Apply the sign to an unpromoted magnitude, falling back to `BigInt` only
/// when the signed value leaves the `i64` range.
fn narrow(negative: bool, magnitude: u64) -> Term {
    let signed = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    match i64::try_from(signed) {
        Ok(v) => Term::Int64(v),
        Err(_) => Term::BigInt(BigInt::from(signed)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
