//! Fixed-point percentage type.
//!
//! A percentage is held as hundredths of a percent, so `100.00%` is `10_000`
//! and two-decimal percentages add up without drift. Sums saturate at the
//! `i64` bounds, so an absurd split list can never equal `100.00%`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{AmountError, DECIMAL_PLACES, to_fixed_point};

/// A percentage with two fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percentage(i64);

impl Percentage {
    /// 0.00%
    pub const ZERO: Self = Self(0);

    /// 100.00%
    pub const HUNDRED: Self = Self(10_000);

    /// Largest magnitude accepted from a decimal, in hundredths.
    pub const MAX_HUNDREDTHS: i64 = 1_000_000_000_000_000;

    /// Creates a percentage from hundredths of a percent.
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Returns the value in hundredths of a percent.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Converts a decimal with at most two fractional digits.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        let hundredths = to_fixed_point(value)?;
        if hundredths.abs() > Self::MAX_HUNDREDTHS {
            return Err(AmountError::OutOfRange(value));
        }
        Ok(Self(hundredths))
    }

    /// Returns the percentage as a decimal (e.g. `33.34`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Returns true if the percentage is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<Decimal> for Percentage {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Percentage> for Decimal {
    fn from(value: Percentage) -> Self {
        value.to_decimal()
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.to_decimal())
    }
}

impl std::iter::Sum for Percentage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(0i64, |acc, p| acc.saturating_add(p.0)))
    }
}
