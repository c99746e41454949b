//! Fixed-point money type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are held as integer minor units (cents). `rust_decimal::Decimal`
//! is only used at the boundary: parsing, serialization, display.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by [`Money`] and [`super::Percentage`].
pub const DECIMAL_PLACES: u32 = 2;

/// Errors converting a boundary decimal into a fixed-point value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The value has more fractional digits than the fixed-point scale.
    #[error("{0} has more than 2 decimal places")]
    TooManyDecimals(Decimal),

    /// The value does not fit the supported range.
    #[error("{0} is out of range")]
    OutOfRange(Decimal),
}

/// A signed amount of money in minor units (cents).
///
/// `+`, `-` and negation saturate at the `i64` bounds instead of panicking
/// or wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Largest magnitude accepted from a decimal (ten trillion units).
    pub const MAX_CENTS: i64 = 1_000_000_000_000_000;

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Converts a decimal with at most two fractional digits.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitpot_shared::types::Money;
    ///
    /// assert_eq!(Money::from_decimal(dec!(10.50)).unwrap().cents(), 1050);
    /// assert!(Money::from_decimal(dec!(0.001)).is_err());
    /// ```
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        let cents = to_fixed_point(value)?;
        if cents.abs() > Self::MAX_CENTS {
            return Err(AmountError::OutOfRange(value));
        }
        Ok(Self(cents))
    }

    /// Returns the amount as a decimal with two fractional digits.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Computes `self * numerator / denominator`, rounded half away from zero
    /// to whole cents.
    ///
    /// Returns `None` when `denominator` is zero or the result overflows.
    #[must_use]
    pub fn checked_ratio(self, numerator: i64, denominator: i64) -> Option<Self> {
        let scaled = round_div(
            i128::from(self.0) * i128::from(numerator),
            i128::from(denominator),
        )?;
        i64::try_from(scaled).ok().map(Self)
    }
}

/// Integer division rounded half away from zero.
///
/// Returns `None` for a zero denominator.
#[must_use]
pub fn round_div(numerator: i128, denominator: i128) -> Option<i128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        let away = if (numerator < 0) == (denominator < 0) { 1 } else { -1 };
        Some(quotient + away)
    } else {
        Some(quotient)
    }
}

/// Scales a decimal by 10^2 and requires the result to be integral.
pub(crate) fn to_fixed_point(value: Decimal) -> Result<i64, AmountError> {
    let scaled = value
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(AmountError::OutOfRange(value))?;
    if !scaled.fract().is_zero() {
        return Err(AmountError::TooManyDecimals(value));
    }
    scaled.to_i64().ok_or(AmountError::OutOfRange(value))
}

impl TryFrom<Decimal> for Money {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl std::str::FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| format!("Invalid amount {s:?}: {e}"))?;
        Self::from_decimal(value).map_err(|e| e.to_string())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// ISO 4217 currency codes used when presenting amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    #[default]
    Eur,
    /// US Dollar
    Usd,
    /// Pound Sterling
    Gbp,
    /// Swiss Franc
    Chf,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eur => write!(f, "EUR"),
            Self::Usd => write!(f, "USD"),
            Self::Gbp => write!(f, "GBP"),
            Self::Chf => write!(f, "CHF"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "GBP" => Ok(Self::Gbp),
            "CHF" => Ok(Self::Chf),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
