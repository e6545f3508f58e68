//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers (`109.95`). They are held as a
//! [`Decimal`] so cart subtotals never accumulate float rounding error, and
//! written back out as JSON numbers so request bodies match the catalog API.

use core::fmt;
use core::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::cart::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be positive (got {0})")]
    NotPositive(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A positive price in the store currency's standard unit (dollars, not cents).
///
/// ```
/// use gigashop_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1995, 2)).unwrap();
/// assert_eq!(price.to_string(), "$19.95");
/// assert!(Price::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if `amount <= 0`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive(amount));
        }
        Ok(Self(amount))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// A price of `cents` hundredths, usable in constants.
    #[must_use]
    pub const fn from_cents(cents: NonZeroU32) -> Self {
        Self(Decimal::from_parts(cents.get(), 0, 0, false, 2))
    }

    /// Price of `quantity` units, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn times(&self, quantity: Quantity) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity.get()))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(#[serde(with = "rust_decimal::serde::float")] Decimal),
            Text(String),
        }

        let amount = match Raw::deserialize(deserializer)? {
            Raw::Number(amount) => amount,
            Raw::Text(text) => text
                .trim()
                .parse::<Decimal>()
                .map_err(serde::de::Error::custom)?,
        };
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
