//! Integer price and size units.
//!
//! The exchange trades whole ticks and whole lots, so both wrap `i64`.
//! A `Size` is signed where the exchange encodes direction in the sign
//! (resting ask levels, order quantities) and a magnitude everywhere else.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::order::OrderSide;

/// Limit price in ticks.
///
/// Serialized as a bare integer, including when used as a map key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(pub i64);

impl Price {
    #[inline]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Exact decimal value, for mid and spread arithmetic.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Quantity in lots.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Size(pub i64);

impl Size {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Magnitude, saturating at `i64::MAX`.
    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Sign the magnitude for `side`: positive buys, negative sells.
    #[inline]
    pub fn signed(&self, side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => *self,
            OrderSide::Sell => Self(self.0.saturating_neg()),
        }
    }

    #[inline]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Size {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_signed_size() {
        assert_eq!(Size(5).signed(OrderSide::Buy), Size(5));
        assert_eq!(Size(5).signed(OrderSide::Sell), Size(-5));
        assert_eq!(Size(-7).abs(), Size(7));
    }

    #[test]
    fn test_extremes_saturate() {
        assert_eq!(Size(i64::MIN).abs(), Size(i64::MAX));
        assert_eq!(Size(i64::MIN).signed(OrderSide::Sell), Size(i64::MAX));
        assert_eq!(Size(i64::MAX).saturating_add(Size(1)), Size(i64::MAX));
    }

    #[test]
    fn test_price_serializes_as_integer_key() {
        let levels: BTreeMap<Price, Size> = [(Price(10), Size(5))].into_iter().collect();
        let json = serde_json::to_string(&levels).unwrap();
        assert_eq!(json, r#"{"10":5}"#);
        let back: BTreeMap<Price, Size> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, levels);
    }

    #[test]
    fn test_price_decimal() {
        assert_eq!(Price(2021).to_decimal(), Decimal::from(2021));
        assert!(!Price(0).is_positive());
    }
}
