//! Per-tick input and output.
//!
//! `TradingState` is what the exchange hands the strategy on every tick;
//! `TickOutput` is what the strategy hands back. The `trader_data` string
//! is the only memory that crosses ticks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Order, OrderDepth, Price, Size, Symbol};

/// A completed trade reported by the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Size,
    #[serde(default)]
    pub buyer: String,
    #[serde(default)]
    pub seller: String,
    #[serde(default)]
    pub timestamp: i64,
}

/// Everything the strategy sees on one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingState {
    #[serde(default)]
    pub timestamp: i64,
    /// Opaque state blob returned by the previous tick (empty on the first).
    #[serde(default)]
    pub trader_data: String,
    #[serde(default)]
    pub order_depths: BTreeMap<Symbol, OrderDepth>,
    /// Net signed position per instrument. Missing = flat.
    #[serde(default)]
    pub position: BTreeMap<Symbol, i64>,
    #[serde(default)]
    pub own_trades: BTreeMap<Symbol, Vec<Trade>>,
    #[serde(default)]
    pub market_trades: BTreeMap<Symbol, Vec<Trade>>,
}

impl TradingState {
    /// Current position for an instrument (0 when absent).
    pub fn position_of(&self, symbol: &str) -> i64 {
        self.position.get(symbol).copied().unwrap_or(0)
    }

    /// Instruments with a book this tick.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.order_depths.keys()
    }
}

/// Everything the strategy returns for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Orders per instrument, in emission order.
    pub orders: BTreeMap<Symbol, Vec<Order>>,
    /// Conversion requests. Conversions are not modelled, so always 0.
    pub conversions: i64,
    /// State blob the caller must pass back verbatim next tick.
    pub trader_data: String,
}

impl TickOutput {
    /// Total number of orders across all instruments.
    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }

    pub fn iter_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trading_state_from_minimal_json() {
        let json = r#"{
            "timestamp": 100,
            "order_depths": {"KELP": {"buy_orders": {"10": 5}, "sell_orders": {"12": -4}}},
            "position": {"KELP": -3}
        }"#;
        let state: TradingState = serde_json::from_str(json).unwrap();
        assert_eq!(state.timestamp, 100);
        assert_eq!(state.trader_data, "");
        assert_eq!(state.position_of("KELP"), -3);
        assert_eq!(state.position_of("RAINFOREST_RESIN"), 0);
        assert_eq!(state.symbols().count(), 1);
    }

    #[test]
    fn test_order_count() {
        let mut out = TickOutput::default();
        out.orders.insert(
            "KELP".to_string(),
            vec![Order::buy("KELP", 10, 1), Order::sell("KELP", 12, 1)],
        );
        out.orders.insert("RAINFOREST_RESIN".to_string(), Vec::new());
        assert_eq!(out.order_count(), 2);
        assert_eq!(out.iter_orders().count(), 2);
    }
}
