//! Fixed-point price type backed by decimal arithmetic.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty after normalization.
    #[error("price required")]
    Required,
    /// The input cannot be parsed as a decimal number.
    #[error("not a number")]
    NotANumber,
    /// The parsed value is zero or negative.
    #[error("must be positive")]
    NotPositive,
}

/// A strictly positive amount of money with exactly two decimal places.
///
/// User input is normalized before parsing: surrounding whitespace is
/// trimmed and a comma decimal separator is treated like a dot. Accepted
/// values are quantized to two decimal places with banker's rounding.
///
/// ## Examples
///
/// ```
/// use berrystand_core::Price;
///
/// let price = Price::parse("12,50").unwrap();
/// assert_eq!(price.to_string(), "12.50");
///
/// assert!(Price::parse("").is_err());      // empty
/// assert!(Price::parse("apples").is_err()); // not a number
/// assert!(Price::parse("-3").is_err());     // not positive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Number of decimal places a price carries.
    pub const SCALE: u32 = 2;

    /// Parse a `Price` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty after trimming
    /// - Cannot be parsed as a decimal number
    /// - Is zero or negative
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let normalized = raw.trim().replace(',', ".");
        if normalized.is_empty() {
            return Err(PriceError::Required);
        }

        let value = Decimal::from_str(&normalized).map_err(|_| PriceError::NotANumber)?;

        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        Ok(Self::from_decimal(value))
    }

    /// Build a `Price` from a decimal amount, quantizing to two places.
    #[must_use]
    pub fn from_decimal(value: Decimal) -> Self {
        let mut quantized = value.round_dp(Self::SCALE);
        quantized.rescale(Self::SCALE);
        Self(quantized)
    }

    /// A zero total (the empty-basket sum); not a valid product price.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_decimal(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}
