//! Type-safe price representation using decimal arithmetic.
//!
//! The backend gateway transmits prices as plain JSON numbers, so `Price`
//! is a transparent wrapper around [`rust_decimal::Decimal`] (serialized
//! as a float via the `serde-float` feature). Keeping the decimal type
//! avoids binary-float drift when summing cart lines.

use core::fmt;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in US dollars.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents (e.g., `2499` -> $24.99).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity (e.g., a cart line's unit price times count).
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(2499).display(), "$24.99");
        assert_eq!(Price::from_cents(500).display(), "$5.00");
        assert_eq!(Price::from_cents(0), Price::ZERO);
    }

    #[test]
    fn test_times() {
        let unit = Price::from_cents(1299);
        assert_eq!(unit.times(3), Price::from_cents(3897));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_add() {
        let total = Price::from_cents(1000) + Price::from_cents(299);
        assert_eq!(total, Price::from_cents(1299));
    }

    #[test]
    fn test_ordering() {
        assert!(Price::from_cents(999) < Price::from_cents(1000));
    }

    #[test]
    fn test_serde_as_number() {
        let price = Price::from_cents(1850);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "18.5");

        let parsed: Price = serde_json::from_str("18.5").unwrap();
        assert_eq!(parsed.display(), "$18.50");
    }
}
