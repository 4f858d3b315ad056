//! Take-only fair-value strategy.
//!
//! Uses the moving average as the acceptable price and crosses whenever the
//! touch is on the wrong side of it: buy the best ask below fair value, sell
//! the best bid above. No passive quotes and no volatility tracking.

use quoter_core::{Order, OrderDepth, OrderSide};
use rust_decimal::Decimal;

use crate::config::InstrumentConfig;
use crate::history::PriceHistoryStore;
use crate::inventory::Inventory;

/// Acceptable price for `symbol` this tick.
///
/// A two-sided book records its mid price first. A one-sided book leaves the
/// history alone and reuses the retained mean; `None` when nothing is retained.
pub fn acceptable_price(
    symbol: &str,
    depth: &OrderDepth,
    config: &InstrumentConfig,
    history: &mut PriceHistoryStore,
) -> Option<Decimal> {
    match depth.top_of_book() {
        Some(top) => Some(history.update(symbol, top.mid_price(), config.ma_window)),
        None => history.moving_average(symbol),
    }
}

/// Orders for one instrument.
pub fn fair_value_orders(
    symbol: &str,
    depth: &OrderDepth,
    inventory: &Inventory,
    acceptable: Decimal,
) -> Vec<Order> {
    let mut orders = Vec::new();

    if let Some((ask, ask_size)) = depth.best_ask() {
        let size = inventory.take_size(OrderSide::Buy, ask_size);
        if ask.to_decimal() < acceptable && size.is_positive() {
            orders.push(Order::new(symbol, OrderSide::Buy, ask, size));
        }
    }

    if let Some((bid, bid_size)) = depth.best_bid() {
        let size = inventory.take_size(OrderSide::Sell, bid_size);
        if bid.to_decimal() > acceptable && size.is_positive() {
            orders.push(Order::new(symbol, OrderSide::Sell, bid, size));
        }
    }

    orders
}
