//! Order intents submitted to the exchange.
//!
//! An order is a limit price plus a signed quantity: positive buys,
//! negative sells. Passive quotes and liquidity-taking orders share
//! the same wire shape.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::units::{Price, Size};

/// Instrument identifier as used by the exchange (e.g. "KELP").
pub type Symbol = String;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell.
    pub fn sign(&self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// A single order intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub symbol: Symbol,
    pub price: Price,
    /// Signed quantity: positive = buy, negative = sell.
    pub quantity: Size,
}

impl Order {
    /// Build an order from an unsigned size and a side.
    pub fn new(symbol: impl Into<Symbol>, side: OrderSide, price: Price, size: Size) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            quantity: size.signed(side),
        }
    }

    /// Buy `size` lots at `price` ticks.
    pub fn buy(symbol: impl Into<Symbol>, price: i64, size: i64) -> Self {
        Self::new(symbol, OrderSide::Buy, Price(price), Size(size))
    }

    /// Sell `size` lots at `price` ticks.
    pub fn sell(symbol: impl Into<Symbol>, price: i64, size: i64) -> Self {
        Self::new(symbol, OrderSide::Sell, Price(price), Size(size))
    }

    pub fn side(&self) -> OrderSide {
        if self.quantity.inner() >= 0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        }
    }

    /// Unsigned quantity.
    pub fn size(&self) -> Size {
        self.quantity.abs()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x {} @ {}",
            self.side(),
            self.symbol,
            self.size(),
            self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantity() {
        let bid = Order::buy("KELP", 10, 5);
        let ask = Order::sell("KELP", 12, 5);
        assert_eq!(bid.quantity, Size(5));
        assert_eq!(ask.quantity, Size(-5));
        assert_eq!(bid.side(), OrderSide::Buy);
        assert_eq!(ask.side(), OrderSide::Sell);
        assert_eq!(ask.size(), Size(5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Order::sell("KELP", 12, 3).to_string(), "sell KELP x 3 @ 12");
    }

    #[test]
    fn test_wire_shape_is_bare_integers() {
        let json = serde_json::to_string(&Order::sell("KELP", 12, 3)).unwrap();
        assert_eq!(json, r#"{"symbol":"KELP","price":12,"quantity":-3}"#);
    }

    #[test]
    fn test_opposite_side() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.sign(), -1);
    }
}
