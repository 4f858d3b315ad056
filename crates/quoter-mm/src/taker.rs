//! Opportunistic liquidity taking.
//!
//! Crosses the spread when the touch is mispriced against the moving
//! average by more than a fixed margin: buy the best ask when it is more
//! than 2% below fair value, sell the best bid when it is more than 2%
//! above. Comparisons are strict and exact. A threshold that does not fit a
//! `Decimal` never triggers.

use quoter_core::{OrderSide, TopOfBook};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::inventory::Inventory;
use crate::quote_engine::QuoteLevel;

/// Buy when `best_ask < moving_average × TAKE_BUY_BELOW`.
pub const TAKE_BUY_BELOW: Decimal = dec!(0.98);

/// Sell when `best_bid > moving_average × TAKE_SELL_ABOVE`.
pub const TAKE_SELL_ABOVE: Decimal = dec!(1.02);

/// Marketable orders for one instrument. Sizes are unsigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TakeDecision {
    /// Buy at the best ask.
    pub buy: Option<QuoteLevel>,
    /// Sell at the best bid.
    pub sell: Option<QuoteLevel>,
}

impl TakeDecision {
    pub fn is_empty(&self) -> bool {
        self.buy.is_none() && self.sell.is_none()
    }
}

/// Decide whether to cross the spread on either side.
pub fn find_takes(top: &TopOfBook, moving_average: Decimal, inventory: &Inventory) -> TakeDecision {
    let mut decision = TakeDecision::default();

    let buy_below = moving_average.checked_mul(TAKE_BUY_BELOW);
    if buy_below.is_some_and(|threshold| top.best_ask.to_decimal() < threshold) {
        let size = inventory.take_size(OrderSide::Buy, top.best_ask_size);
        if size.is_positive() {
            decision.buy = Some(QuoteLevel {
                price: top.best_ask,
                size,
            });
        }
    }

    let sell_above = moving_average.checked_mul(TAKE_SELL_ABOVE);
    if sell_above.is_some_and(|threshold| top.best_bid.to_decimal() > threshold) {
        let size = inventory.take_size(OrderSide::Sell, top.best_bid_size);
        if size.is_positive() {
            decision.sell = Some(QuoteLevel {
                price: top.best_bid,
                size,
            });
        }
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use quoter_core::{OrderDepth, Size};

    fn top(bid: (i64, i64), ask: (i64, i64)) -> TopOfBook {
        OrderDepth::new([bid], [ask])
            .top_of_book()
            .unwrap()
    }

    #[test]
    fn test_no_take_at_exact_discount_threshold() {
        // 0.98 × 100 = 98 exactly: not strictly below
        let t = top((90, 10), (98, -7));
        let d = find_takes(&t, dec!(100), &Inventory::new(0, 50));
        assert!(d.buy.is_none());
    }

    #[test]
    fn test_take_one_unit_below_threshold() {
        let t = top((90, 10), (97, -7));
        let d = find_takes(&t, dec!(100), &Inventory::new(0, 50));
        assert_eq!(d.buy, Some(QuoteLevel::new(97, 7)));
        assert!(d.sell.is_none());
    }

    #[test]
    fn test_take_buy_capped_by_headroom() {
        let t = top((90, 10), (97, -30));
        let d = find_takes(&t, dec!(100), &Inventory::new(40, 50));
        assert_eq!(d.buy.unwrap().size, Size(10));
    }

    #[test]
    fn test_no_take_buy_at_limit() {
        let t = top((90, 10), (97, -30));
        let d = find_takes(&t, dec!(100), &Inventory::new(50, 50));
        assert!(d.is_empty());
    }

    #[test]
    fn test_no_take_at_exact_premium_threshold() {
        // 1.02 × 100 = 102 exactly
        let t = top((102, 6), (110, -5));
        let d = find_takes(&t, dec!(100), &Inventory::new(0, 50));
        assert!(d.sell.is_none());
    }

    #[test]
    fn test_take_sell_above_premium() {
        let t = top((103, 6), (110, -5));
        let d = find_takes(&t, dec!(100), &Inventory::new(-45, 50));
        // headroom_sell = 5
        assert_eq!(d.sell, Some(QuoteLevel::new(103, 5)));
    }

    #[test]
    fn test_threshold_overflow_takes_nothing() {
        // 1.02 × Decimal::MAX does not fit; the buy threshold still does
        let t = top((103, 6), (110, -5));
        let d = find_takes(&t, Decimal::MAX, &Inventory::new(0, 50));
        assert!(d.sell.is_none());
        assert_eq!(d.buy, Some(QuoteLevel::new(110, 5)));
    }

    #[test]
    fn test_fairly_priced_book_takes_nothing() {
        let t = top((99, 6), (101, -5));
        assert!(find_takes(&t, dec!(100), &Inventory::new(0, 50)).is_empty());
    }
}
