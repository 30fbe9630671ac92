// SPDX-License-Identifier: MIT OR Apache-2.0
//! Exact decimal JSON numbers
//!
//! A [`JsonNumber`] keeps the literal it was read from (or formatted to) for
//! output, and a canonical `sign × digits × 10^exponent` form for equality,
//! hashing and exact conversions. The canonical digits carry no leading or
//! trailing zeros, so `1`, `1.0`, `10e-1` and `0.1e1` are the same number.
//! Exponents are unbounded: any literal the grammar accepts is a number.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_traits::{ToPrimitive, Zero};

use crate::error::{OghamError, Result};

/// Longest integer (in decimal digits) that can fit in an `i128` unchanged
const I128_SAFE_DIGITS: usize = 38;

/// Decimal exponent past which every finite `f64` rounds to zero or infinity
const F64_EXPONENT_LIMIT: i64 = 400;

/// A JSON number with an exact decimal value
#[derive(Clone)]
pub struct JsonNumber {
    repr: Box<str>,
    negative: bool,
    digits: Box<str>,
    exponent: BigInt,
}

impl JsonNumber {
    /// Largest integer part, in decimal digits, that [`JsonNumber::big_int_exact`]
    /// and [`JsonNumber::to_big_int`] expand
    pub const MAX_EXPANDED_DIGITS: usize = 1 << 16;

    /// Parse a JSON number literal.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::InvalidNumber`] if `literal` does not match the
    /// RFC 8259 number grammar.
    pub fn parse(literal: &str) -> Result<Self> {
        let (negative, digits, exponent) =
            canonicalize(literal).ok_or_else(|| OghamError::InvalidNumber(literal.to_owned()))?;
        Ok(Self {
            repr: literal.into(),
            negative,
            digits: digits.into_boxed_str(),
            exponent,
        })
    }

    /// Convert a float.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::NonFinite`] for NaN and the infinities.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(OghamError::NonFinite(value));
        }
        let mut buffer = ryu::Buffer::new();
        Self::parse(buffer.format_finite(value))
    }

    /// The literal text, as read or as formatted on construction
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.repr
    }

    /// Whether the value has no fractional part
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.exponent.sign() != Sign::Minus
    }

    /// Whether the value is strictly below zero
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Nearest `f64`; out-of-range magnitudes become infinities, vanishing
    /// ones a signed zero
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        let magnitude = self.exponent.to_i64().map_or_else(
            || {
                if self.is_integral() {
                    f64::INFINITY
                } else {
                    0.0
                }
            },
            |exponent| {
                let digits = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
                match exponent.saturating_add(digits) {
                    e if e > F64_EXPONENT_LIMIT => f64::INFINITY,
                    e if e < -F64_EXPONENT_LIMIT => 0.0,
                    _ => self.repr.trim_start_matches('-').parse().unwrap_or(f64::NAN),
                }
            },
        );
        if self.negative { -magnitude } else { magnitude }
    }

    /// Truncate toward zero and saturate to the `i64` range
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        if self.integer_len() > I128_SAFE_DIGITS {
            return if self.negative { i64::MIN } else { i64::MAX };
        }
        let truncated = self.to_big_int();
        truncated.to_i64().unwrap_or(if self.negative { i64::MIN } else { i64::MAX })
    }

    /// Truncate toward zero and saturate to the `i32` range
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        let wide = self.as_i64();
        i32::try_from(wide).unwrap_or(if wide < 0 { i32::MIN } else { i32::MAX })
    }

    /// Exact `i64` value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Arithmetic`] if the number has a fractional part
    /// or does not fit.
    pub fn i64_exact(&self) -> Result<i64> {
        self.small_integer()
            .and_then(|v| i64::try_from(v).ok())
            .ok_or_else(|| self.arithmetic("i64"))
    }

    /// Exact `i32` value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Arithmetic`] if the number has a fractional part
    /// or does not fit.
    pub fn i32_exact(&self) -> Result<i32> {
        self.small_integer()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| self.arithmetic("i32"))
    }

    /// Exact `u64` value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Arithmetic`] if the number is negative, has a
    /// fractional part or does not fit.
    pub fn u64_exact(&self) -> Result<u64> {
        self.small_integer()
            .and_then(|v| u64::try_from(v).ok())
            .ok_or_else(|| self.arithmetic("u64"))
    }

    /// Exact arbitrary-precision integer value.
    ///
    /// # Errors
    ///
    /// Returns [`OghamError::Arithmetic`] if the number has a fractional part
    /// or an integer part longer than [`JsonNumber::MAX_EXPANDED_DIGITS`].
    pub fn big_int_exact(&self) -> Result<BigInt> {
        if !self.is_integral() || self.integer_len() > Self::MAX_EXPANDED_DIGITS {
            return Err(self.arithmetic("integer"));
        }
        let scale = self
            .exponent
            .to_u32()
            .ok_or_else(|| self.arithmetic("integer"))?;
        Ok(self.significand() * BigInt::from(10u8).pow(scale))
    }

    /// Integer part, truncated toward zero. An integer part longer than
    /// [`JsonNumber::MAX_EXPANDED_DIGITS`] is not expanded and yields zero;
    /// [`JsonNumber::big_int_exact`] reports it as an error instead.
    #[must_use]
    pub fn to_big_int(&self) -> BigInt {
        if self.is_integral() {
            return self.big_int_exact().unwrap_or_default();
        }
        let drop = (-&self.exponent).to_usize().unwrap_or(usize::MAX);
        if drop >= self.digits.len() {
            return BigInt::zero();
        }
        let kept = &self.digits[..self.digits.len() - drop];
        let magnitude = BigInt::parse_bytes(kept.as_bytes(), 10).unwrap_or_default();
        if self.negative { -magnitude } else { magnitude }
    }

    fn significand(&self) -> BigInt {
        let magnitude = BigInt::parse_bytes(self.digits.as_bytes(), 10).unwrap_or_default();
        if self.negative { -magnitude } else { magnitude }
    }

    /// Number of decimal digits in the integer part, saturating
    fn integer_len(&self) -> usize {
        if !self.is_integral() {
            return self.digits.len();
        }
        self.exponent
            .to_usize()
            .map_or(usize::MAX, |exponent| self.digits.len().saturating_add(exponent))
    }

    /// Exact value when integral and small enough to expand into an `i128`
    fn small_integer(&self) -> Option<i128> {
        if !self.is_integral() || self.integer_len() > I128_SAFE_DIGITS {
            return None;
        }
        let magnitude: i128 = self.digits.parse().ok()?;
        let magnitude = magnitude.checked_mul(10_i128.checked_pow(self.exponent.to_u32()?)?)?;
        Some(if self.negative { -magnitude } else { magnitude })
    }

    fn arithmetic(&self, target: &'static str) -> OghamError {
        OghamError::Arithmetic {
            number: self.repr.to_string(),
            target,
        }
    }
}

/// Split a literal into `(negative, digits, exponent)` with digits stripped of
/// leading and trailing zeros. `None` if the literal is not a JSON number.
fn canonicalize(literal: &str) -> Option<(bool, String, BigInt)> {
    let bytes = literal.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);
    let mut i = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while is_digit(i) {
                i += 1;
            }
        }
        _ => return None,
    }
    let int_digits = &literal[int_start..i];

    let mut frac_digits = "";
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while is_digit(i) {
            i += 1;
        }
        if i == start {
            return None;
        }
        frac_digits = &literal[start..i];
    }

    let mut exp = BigInt::zero();
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        let exp_negative = match bytes.get(i) {
            Some(b'-') => {
                i += 1;
                true
            }
            Some(b'+') => {
                i += 1;
                false
            }
            _ => false,
        };
        let start = i;
        while is_digit(i) {
            i += 1;
        }
        if i == start {
            return None;
        }
        exp = BigInt::parse_bytes(&bytes[start..i], 10)?;
        if exp_negative {
            exp = -exp;
        }
    }

    if i != bytes.len() {
        return None;
    }

    let mut digits: String = int_digits
        .chars()
        .chain(frac_digits.chars())
        .skip_while(|&c| c == '0')
        .collect();
    if digits.is_empty() {
        return Some((false, "0".to_owned(), BigInt::zero()));
    }
    let significant = digits.trim_end_matches('0').len();
    let exponent = exp - frac_digits.len() + (digits.len() - significant);
    digits.truncate(significant);
    Some((negative, digits, exponent))
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        self.negative == other.negative
            && self.exponent == other.exponent
            && self.digits == other.digits
    }
}

impl Eq for JsonNumber {}

impl Hash for JsonNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.negative.hash(state);
        self.digits.hash(state);
        self.exponent.hash(state);
    }
}

impl fmt::Debug for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonNumber({})", self.repr)
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl FromStr for JsonNumber {
    type Err = OghamError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNumber {
                fn from(value: $ty) -> Self {
                    let mut buffer = itoa::Buffer::new();
                    let literal = buffer.format(value);
                    let (negative, digits, exponent) =
                        canonicalize(literal).unwrap_or((false, "0".to_owned(), BigInt::zero()));
                    Self {
                        repr: literal.into(),
                        negative,
                        digits: digits.into_boxed_str(),
                        exponent,
                    }
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize);

impl From<&BigInt> for JsonNumber {
    fn from(value: &BigInt) -> Self {
        let literal = value.to_string();
        let (negative, digits, exponent) =
            canonicalize(&literal).unwrap_or((false, "0".to_owned(), BigInt::zero()));
        Self {
            repr: literal.into_boxed_str(),
            negative,
            digits: digits.into_boxed_str(),
            exponent,
        }
    }
}

impl From<BigInt> for JsonNumber {
    fn from(value: BigInt) -> Self {
        Self::from(&value)
    }
}

impl TryFrom<f64> for JsonNumber {
    type Error = OghamError;

    fn try_from(value: f64) -> Result<Self> {
        Self::from_f64(value)
    }
}
