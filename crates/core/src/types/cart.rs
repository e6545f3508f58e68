//! Cart line types.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;

/// Errors that can occur when converting a raw number into a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Input is not an integer.
    #[error("invalid quantity: {0}")]
    Invalid(String),
    /// Zero or negative quantity.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// Quantity does not fit in a `u32`.
    #[error("quantity {0} is too large")]
    TooLarge(i64),
}

/// A positive item count.
///
/// `Quantity::default()` is one, the count used when a product is added
/// without an explicit quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(count: u32) -> Option<Self> {
        match NonZeroU32::new(count) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Clamp a raw count into range: `<= 0` yields `None`, values above
    /// `u32::MAX` saturate.
    #[must_use]
    pub fn clamped(count: i64) -> Option<Self> {
        if count <= 0 {
            return None;
        }
        Self::new(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// The count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Sum two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(count: i64) -> Result<Self, Self::Error> {
        if count <= 0 {
            return Err(QuantityError::NotPositive(count));
        }
        u32::try_from(count)
            .ok()
            .and_then(Self::new)
            .ok_or(QuantityError::TooLarge(count))
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s
            .trim()
            .parse::<i64>()
            .map_err(|_| QuantityError::Invalid(s.to_owned()))?;
        Self::try_from(count)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let count = i64::deserialize(deserializer)?;
        Self::try_from(count).map_err(serde::de::Error::custom)
    }
}

/// One product line in a cart.
///
/// Serialized as `{"productId": 1, "quantity": 2}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: Quantity,
}

impl CartEntry {
    /// Create a cart entry.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: Quantity) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        assert_eq!(Quantity::try_from(0), Err(QuantityError::NotPositive(0)));
        assert_eq!(Quantity::try_from(-3), Err(QuantityError::NotPositive(-3)));
        assert_eq!(Quantity::try_from(4).unwrap().get(), 4);
    }

    #[test]
    fn test_quantity_too_large() {
        let big = i64::from(u32::MAX) + 1;
        assert_eq!(Quantity::try_from(big), Err(QuantityError::TooLarge(big)));
    }

    #[test]
    fn test_quantity_clamped() {
        assert_eq!(Quantity::clamped(0), None);
        assert_eq!(Quantity::clamped(-1), None);
        assert_eq!(Quantity::clamped(i64::MAX).unwrap().get(), u32::MAX);
    }

    #[test]
    fn test_quantity_from_str() {
        assert_eq!("3".parse::<Quantity>().unwrap().get(), 3);
        assert!(matches!("x".parse::<Quantity>(), Err(QuantityError::Invalid(_))));
        assert_eq!("0".parse::<Quantity>(), Err(QuantityError::NotPositive(0)));
    }

    #[test]
    fn test_quantity_saturating_add() {
        let max = Quantity::new(u32::MAX).unwrap();
        assert_eq!(max.saturating_add(Quantity::ONE), max);
        let two = Quantity::ONE.saturating_add(Quantity::ONE);
        assert_eq!(two.get(), 2);
    }

    #[test]
    fn test_quantity_default_is_one() {
        assert_eq!(Quantity::default(), Quantity::ONE);
    }

    #[test]
    fn test_cart_entry_wire_format() {
        let entry = CartEntry::new(ProductId::new(2), Quantity::ONE);
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"productId":2,"quantity":1}"#
        );
    }

    #[test]
    fn test_cart_entry_rejects_zero_quantity() {
        let result = serde_json::from_str::<CartEntry>(r#"{"productId":2,"quantity":0}"#);
        assert!(result.is_err());
    }
}
