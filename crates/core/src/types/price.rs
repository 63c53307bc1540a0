//! Type-safe cost representation using decimal arithmetic.
//!
//! The backend sends costs as plain JSON numbers. They are parsed straight
//! into a [`Decimal`] so that cart totals never accumulate float error.

use core::fmt;
use core::ops::Mul;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The price of a single unit of a product.
///
/// Serialized as a JSON number to match the backend's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Cost(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Cost {
    /// A zero cost.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new cost.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a cost from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Cost of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl Mul<u32> for Cost {
    type Output = Decimal;

    fn mul(self, quantity: u32) -> Decimal {
        self.times(quantity)
    }
}

impl From<Decimal> for Cost {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0.normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_json_number() {
        let cost: Cost = serde_json::from_str("50").unwrap();
        assert_eq!(cost, Cost::from_units(50));

        let cost: Cost = serde_json::from_str("12.5").unwrap();
        assert_eq!(cost.amount(), Decimal::new(125, 1));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(serde_json::from_str::<Cost>("\"cheap\"").is_err());
        assert!(serde_json::from_str::<Cost>("null").is_err());
    }

    #[test]
    fn test_times() {
        assert_eq!(Cost::from_units(5) * 3, Decimal::from(15));
        assert_eq!(Cost::from_units(5).times(0), Decimal::ZERO);
        assert_eq!(Cost::new(Decimal::MAX).times(2), Decimal::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost::from_units(100).to_string(), "$100");
        assert_eq!(Cost::new(Decimal::new(1250, 2)).to_string(), "$12.5");
    }
}
