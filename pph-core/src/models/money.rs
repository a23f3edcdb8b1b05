//! Fixed-point rupiah amounts.
//!
//! [`Money`] stores an amount as a signed 64-bit integer scaled by
//! [`Money::SCALE`] (10,000), i.e. four fractional digits. Rates are encoded
//! the same way, so `0.0500` represents 5%.
//!
//! # Rounding
//!
//! Every operation that has to drop digits below one scaled unit
//! ([`Money::checked_mul`], [`Money::checked_div`], [`Money::percent`],
//! [`Money::checked_div_by`], [`Money::round_to_rupiah`]) rounds half away
//! from zero. Addition and subtraction are exact. Nothing wraps: results
//! outside the `i64` range fail with [`MoneyError::Overflow`].
//!
//! # Text format
//!
//! Formatting and parsing share a single Indonesian convention: `.` groups
//! thousands and `,` separates the fraction (`1.234.567,8900`). The output of
//! [`Money::format`] is always accepted by [`Money::parse_indonesian`] and
//! yields the same value.
//!
//! # Example
//!
//! ```
//! use pph_core::Money;
//!
//! let salary = Money::parse_indonesian("10.000.000").unwrap();
//! let rate = Money::from_raw(500); // 0.0500
//!
//! let tax = salary.checked_mul(rate).unwrap();
//!
//! assert_eq!(tax, Money::from_rupiah(500_000).unwrap());
//! assert_eq!(tax.format(), "500.000,0000");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::div_round_half_up;
use crate::error::ErrorKind;

/// Errors produced by [`Money`] construction, parsing and arithmetic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The fractional part passed to [`Money::create`] was not in `0..=9999`.
    #[error("fraction must be between 0 and 9999, got {0}")]
    InvalidFraction(i64),

    /// A division or percentage was requested with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A decimal value has more than four fractional digits.
    #[error("{0} cannot be represented with four decimal places")]
    InexactValue(Decimal),

    /// A string could not be parsed as an Indonesian-format amount.
    #[error("cannot parse '{input}' as money: {reason}")]
    Parse { input: String, reason: &'static str },

    /// The result does not fit in the 64-bit scaled representation.
    #[error("arithmetic overflow")]
    Overflow,
}

impl MoneyError {
    /// Maps the error onto the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFraction(_) | Self::DivisionByZero | Self::InexactValue(_) => {
                ErrorKind::InvalidArgument
            }
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Overflow => ErrorKind::Overflow,
        }
    }
}

/// A rupiah amount (or a rate) with exactly four fractional digits.
///
/// Serialized as the raw scaled integer; consumers reconstruct the decimal
/// amount by dividing by [`Money::SCALE`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

const THOUSAND_RUPIAH: i64 = 1_000 * Money::SCALE;

impl Money {
    /// Number of scaled units per rupiah.
    pub const SCALE: i64 = 10_000;

    pub const ZERO: Money = Money(0);

    /// One rupiah, or a rate of 100%.
    pub const ONE: Money = Money(Self::SCALE);

    /// Wraps a raw scaled value (`amount × 10,000`).
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Whole-rupiah constant for static tables. Only used in const items,
    /// where an overflow is a compile error.
    pub(crate) const fn rupiah(whole: i64) -> Self {
        Self(whole * Self::SCALE)
    }

    /// Returns the raw scaled value.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Creates an amount from a whole part and a four-digit fraction.
    ///
    /// A negative `whole` extends the magnitude, so `create(-5, 5000)` is
    /// `-5,5000`.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidFraction`] if `frac` is not in `0..=9999`
    /// and [`MoneyError::Overflow`] if the amount is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use pph_core::Money;
    ///
    /// let amount = Money::create(100, 5000).unwrap();
    /// assert_eq!(amount.raw(), 1_005_000);
    /// assert_eq!(amount.whole(), 100);
    /// assert_eq!(amount.fraction(), 5000);
    /// ```
    pub fn create(
        whole: i64,
        frac: i64,
    ) -> Result<Self, MoneyError> {
        if !(0..Self::SCALE).contains(&frac) {
            return Err(MoneyError::InvalidFraction(frac));
        }

        let scaled = whole
            .checked_mul(Self::SCALE)
            .ok_or(MoneyError::Overflow)?;
        let value = if whole < 0 {
            scaled.checked_sub(frac)
        } else {
            scaled.checked_add(frac)
        };

        value.map(Self).ok_or(MoneyError::Overflow)
    }

    /// Creates an amount of whole rupiah.
    pub fn from_rupiah(whole: i64) -> Result<Self, MoneyError> {
        Self::create(whole, 0)
    }

    /// Whole rupiah, truncated toward zero.
    pub const fn whole(self) -> i64 {
        self.0 / Self::SCALE
    }

    /// Fractional digits of the magnitude, in `0..=9999`.
    pub const fn fraction(self) -> i64 {
        (self.0 % Self::SCALE).abs()
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Exact addition.
    pub fn checked_add(
        self,
        other: Money,
    ) -> Result<Self, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Exact subtraction.
    pub fn checked_sub(
        self,
        other: Money,
    ) -> Result<Self, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Multiplies two fixed-point values.
    ///
    /// Both operands carry the 10,000 scale, so the raw product is rescaled
    /// by dividing by [`Money::SCALE`], rounding half away from zero.
    pub fn checked_mul(
        self,
        other: Money,
    ) -> Result<Self, MoneyError> {
        let product = i128::from(self.0) * i128::from(other.0);
        Self::from_wide(div_round_half_up(product, i128::from(Self::SCALE)))
    }

    /// Exact multiplication by an integer count.
    pub fn mul_int(
        self,
        factor: i64,
    ) -> Result<Self, MoneyError> {
        self.0
            .checked_mul(factor)
            .map(Self)
            .ok_or(MoneyError::Overflow)
    }

    /// Divides by an integer, rounding half away from zero.
    pub fn checked_div(
        self,
        divisor: i64,
    ) -> Result<Self, MoneyError> {
        if divisor == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        Self::from_wide(div_round_half_up(i128::from(self.0), i128::from(divisor)))
    }

    /// Divides by another fixed-point value, rounding half away from zero.
    pub fn checked_div_by(
        self,
        divisor: Money,
    ) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let numerator = i128::from(self.0) * i128::from(Self::SCALE);
        Self::from_wide(div_round_half_up(numerator, i128::from(divisor.0)))
    }

    /// Computes `self × numerator / denominator` with a single rounding step.
    ///
    /// Agrees with `checked_div(checked_mul(self, from_rupiah(numerator)),
    /// denominator)` to the scaled unit.
    ///
    /// # Example
    ///
    /// ```
    /// use pph_core::Money;
    ///
    /// let amount = Money::from_rupiah(1_000).unwrap();
    /// assert_eq!(amount.percent(5, 100).unwrap(), Money::from_rupiah(50).unwrap());
    /// ```
    pub fn percent(
        self,
        numerator: i64,
        denominator: i64,
    ) -> Result<Self, MoneyError> {
        if denominator == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        let product = i128::from(self.0) * i128::from(numerator);
        Self::from_wide(div_round_half_up(product, i128::from(denominator)))
    }

    /// Truncates toward zero to a multiple of Rp1.000, as required for PKP.
    pub const fn round_down_thousand(self) -> Self {
        Self(self.0 - self.0 % THOUSAND_RUPIAH)
    }

    /// Rounds to whole rupiah, half away from zero.
    pub fn round_to_rupiah(self) -> Result<Self, MoneyError> {
        let scale = i128::from(Self::SCALE);
        Self::from_wide(div_round_half_up(i128::from(self.0), scale) * scale)
    }

    /// Replaces negative values with zero.
    pub fn clamp_non_negative(self) -> Self {
        self.max(Self::ZERO)
    }

    /// Parses an amount written in Indonesian notation.
    ///
    /// Surrounding whitespace is ignored and a leading `-` marks a negative
    /// amount. `.` separates groups of three digits and a single `,` starts
    /// the fraction, which may have one to four digits.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Parse`] for empty input, input without digits,
    /// characters other than digits and the two separators, more than one
    /// `,`, badly sized digit groups, more than four fractional digits, or an
    /// amount outside the representable range.
    ///
    /// # Example
    ///
    /// ```
    /// use pph_core::Money;
    ///
    /// let amount = Money::parse_indonesian("1.234.567,89").unwrap();
    /// assert_eq!(amount.raw(), 12_345_678_900);
    ///
    /// assert!(Money::parse_indonesian("12,34,56").is_err());
    /// ```
    pub fn parse_indonesian(text: &str) -> Result<Self, MoneyError> {
        let fail = |reason: &'static str| MoneyError::Parse {
            input: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(fail("empty input"));
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (integer_part, fraction_part) = match body.split_once(',') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (body, None),
        };

        if integer_part.is_empty() && fraction_part.is_none() {
            return Err(fail("no digits"));
        }

        let groups: Vec<&str> = integer_part.split('.').collect();
        if groups.len() > 1 {
            let first_ok = (1..=3).contains(&groups[0].len());
            let rest_ok = groups[1..].iter().all(|group| group.len() == 3);
            if !first_ok || !rest_ok {
                return Err(fail("misplaced thousands separator"));
            }
        }

        let mut whole: i128 = 0;
        for ch in groups.concat().chars() {
            let digit = ch
                .to_digit(10)
                .ok_or_else(|| fail("unexpected character"))?;
            whole = whole * 10 + i128::from(digit);
            if whole > i128::from(i64::MAX) {
                return Err(fail("amount out of range"));
            }
        }

        let mut fraction: i128 = 0;
        if let Some(digits) = fraction_part {
            if digits.contains(',') {
                return Err(fail("more than one decimal separator"));
            }
            if digits.is_empty() {
                return Err(fail("missing fractional digits"));
            }
            if digits.len() > 4 {
                return Err(fail("more than four fractional digits"));
            }
            for ch in digits.chars() {
                let digit = ch
                    .to_digit(10)
                    .ok_or_else(|| fail("unexpected character in fraction"))?;
                fraction = fraction * 10 + i128::from(digit);
            }
            for _ in digits.len()..4 {
                fraction *= 10;
            }
        }

        let magnitude = whole * i128::from(Self::SCALE) + fraction;
        let value = if negative { -magnitude } else { magnitude };

        i64::try_from(value)
            .map(Self)
            .map_err(|_| fail("amount out of range"))
    }

    /// Renders the amount with `.` thousands grouping and four fractional
    /// digits after a `,`.
    pub fn format(&self) -> String {
        let magnitude = self.0.unsigned_abs();
        let scale = Self::SCALE.unsigned_abs();
        let digits = (magnitude / scale).to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{sign}{grouped},{:04}", magnitude % scale)
    }

    /// Renders a rate as a percentage with two decimals (`0.0500` → `5,00%`).
    pub fn format_percent(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let hundredths = self.0.unsigned_abs();
        format!("{sign}{},{:02}%", hundredths / 100, hundredths % 100)
    }

    fn from_wide(value: i128) -> Result<Self, MoneyError> {
        i64::try_from(value)
            .map(Self)
            .map_err(|_| MoneyError::Overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.pad(&self.format())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_indonesian(s)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    /// Converts exactly; values with more than four fractional digits are
    /// rejected rather than rounded.
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let scaled = value
            .checked_mul(Decimal::from(Self::SCALE))
            .ok_or(MoneyError::Overflow)?;
        if !scaled.fract().is_zero() {
            return Err(MoneyError::InexactValue(value));
        }
        scaled.to_i64().map(Self).ok_or(MoneyError::Overflow)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        Decimal::new(value.0, 4)
    }
}
