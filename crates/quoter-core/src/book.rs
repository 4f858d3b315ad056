//! Resting order book for a single instrument.
//!
//! The exchange encodes direction in the sign of the resting size:
//! bid levels carry positive sizes, ask levels carry negative sizes.
//! Levels with a non-positive price or a size of the wrong sign are
//! ignored rather than rejected.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::units::{Price, Size};

/// Book state used to decide whether an instrument can be quoted this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Both sides present and best bid < best ask.
    TwoSided,
    /// Both sides present but best bid >= best ask.
    Crossed,
    /// No usable bid level.
    NoBid,
    /// No usable ask level.
    NoAsk,
    /// Neither side has a usable level.
    Empty,
}

impl BookState {
    /// Both sides are present, so a mid price exists.
    pub fn is_quotable(&self) -> bool {
        matches!(self, Self::TwoSided | Self::Crossed)
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoSided => write!(f, "TWO_SIDED"),
            Self::Crossed => write!(f, "CROSSED"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Resting orders for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDepth {
    /// Bid levels: price -> positive size.
    #[serde(default)]
    pub buy_orders: BTreeMap<Price, Size>,
    /// Ask levels: price -> negative size.
    #[serde(default)]
    pub sell_orders: BTreeMap<Price, Size>,
}

impl OrderDepth {
    /// Build from raw `(price, signed size)` levels as the exchange sends them.
    pub fn new(
        buy_orders: impl IntoIterator<Item = (i64, i64)>,
        sell_orders: impl IntoIterator<Item = (i64, i64)>,
    ) -> Self {
        Self {
            buy_orders: buy_orders
                .into_iter()
                .map(|(price, size)| (Price(price), Size(size)))
                .collect(),
            sell_orders: sell_orders
                .into_iter()
                .map(|(price, size)| (Price(price), Size(size)))
                .collect(),
        }
    }

    fn bid_levels(&self) -> impl DoubleEndedIterator<Item = (Price, Size)> + '_ {
        self.buy_orders
            .iter()
            .filter(|(price, size)| price.is_positive() && size.is_positive())
            .map(|(price, size)| (*price, *size))
    }

    fn ask_levels(&self) -> impl Iterator<Item = (Price, Size)> + '_ {
        self.sell_orders
            .iter()
            .filter(|(price, size)| price.is_positive() && size.inner() < 0)
            .map(|(price, size)| (*price, size.abs()))
    }

    /// Highest bid price and its resting size.
    pub fn best_bid(&self) -> Option<(Price, Size)> {
        self.bid_levels().next_back()
    }

    /// Lowest ask price and its resting size (as a positive magnitude).
    pub fn best_ask(&self) -> Option<(Price, Size)> {
        self.ask_levels().next()
    }

    /// Total resting bid size, saturating.
    pub fn bid_volume(&self) -> Size {
        self.bid_levels()
            .fold(Size::ZERO, |total, (_, size)| total.saturating_add(size))
    }

    /// Total resting ask size (as a positive magnitude), saturating.
    pub fn ask_volume(&self) -> Size {
        self.ask_levels()
            .fold(Size::ZERO, |total, (_, size)| total.saturating_add(size))
    }

    pub fn state(&self) -> BookState {
        match (self.best_bid(), self.best_ask()) {
            (None, None) => BookState::Empty,
            (None, Some(_)) => BookState::NoBid,
            (Some(_), None) => BookState::NoAsk,
            (Some((bid, _)), Some((ask, _))) => {
                if bid < ask {
                    BookState::TwoSided
                } else {
                    BookState::Crossed
                }
            }
        }
    }

    /// Snapshot of the top of book, if both sides are present.
    pub fn top_of_book(&self) -> Option<TopOfBook> {
        let (best_bid, best_bid_size) = self.best_bid()?;
        let (best_ask, best_ask_size) = self.best_ask()?;
        Some(TopOfBook {
            best_bid,
            best_bid_size,
            best_ask,
            best_ask_size,
            bid_volume: self.bid_volume(),
            ask_volume: self.ask_volume(),
        })
    }
}

/// Top-of-book view with side volumes. All sizes are positive magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOfBook {
    pub best_bid: Price,
    pub best_bid_size: Size,
    pub best_ask: Price,
    pub best_ask_size: Size,
    /// Sum of all bid sizes (what we could sell into).
    pub bid_volume: Size,
    /// Sum of all ask sizes (what we could buy from).
    pub ask_volume: Size,
}

impl TopOfBook {
    /// Mid price: (bid + ask) / 2, exact.
    pub fn mid_price(&self) -> Decimal {
        (self.best_bid.to_decimal() + self.best_ask.to_decimal()) / Decimal::TWO
    }

    /// Quoted spread in ticks: ask - bid. Negative when crossed.
    pub fn spread(&self) -> i64 {
        self.best_ask.inner() - self.best_bid.inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn depth(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> OrderDepth {
        OrderDepth::new(bids.iter().copied(), asks.iter().copied())
    }

    #[test]
    fn test_best_prices_and_volumes() {
        let d = depth(&[(9, 3), (10, 5)], &[(12, -4), (13, -6)]);
        assert_eq!(d.best_bid(), Some((Price(10), Size(5))));
        assert_eq!(d.best_ask(), Some((Price(12), Size(4))));
        assert_eq!(d.bid_volume(), Size(8));
        assert_eq!(d.ask_volume(), Size(10));
        assert_eq!(d.state(), BookState::TwoSided);
    }

    #[test]
    fn test_mid_price_is_exact() {
        let top = depth(&[(10, 1)], &[(13, -1)]).top_of_book().unwrap();
        assert_eq!(top.mid_price(), dec!(11.5));
        assert_eq!(top.spread(), 3);
    }

    #[test]
    fn test_missing_sides() {
        assert_eq!(depth(&[], &[]).state(), BookState::Empty);
        assert_eq!(depth(&[(10, 1)], &[]).state(), BookState::NoAsk);
        assert_eq!(depth(&[], &[(12, -1)]).state(), BookState::NoBid);
        assert!(depth(&[(10, 1)], &[]).top_of_book().is_none());
    }

    #[test]
    fn test_crossed_book_is_still_quotable() {
        let d = depth(&[(12, 1)], &[(11, -1)]);
        assert_eq!(d.state(), BookState::Crossed);
        assert!(d.state().is_quotable());
        assert!(d.top_of_book().is_some());
    }

    #[test]
    fn test_invalid_levels_ignored() {
        // Zero price, wrong-signed sizes
        let d = depth(&[(0, 5), (11, -2), (10, 3)], &[(12, 4), (14, -2)]);
        assert_eq!(d.best_bid(), Some((Price(10), Size(3))));
        assert_eq!(d.best_ask(), Some((Price(14), Size(2))));
        assert_eq!(d.bid_volume(), Size(3));
        assert_eq!(d.ask_volume(), Size(2));
    }

    #[test]
    fn test_extreme_sizes_saturate() {
        let d = depth(
            &[(9, i64::MAX), (10, i64::MAX)],
            &[(12, i64::MIN), (13, -1)],
        );
        assert_eq!(d.bid_volume(), Size(i64::MAX));
        assert_eq!(d.best_ask(), Some((Price(12), Size(i64::MAX))));
        assert_eq!(d.ask_volume(), Size(i64::MAX));
        let top = d.top_of_book().unwrap();
        assert_eq!(top.spread(), 2);
    }

    #[test]
    fn test_serde_string_keys() {
        let json = r#"{"buy_orders":{"10":5},"sell_orders":{"12":-4}}"#;
        let d: OrderDepth = serde_json::from_str(json).unwrap();
        assert_eq!(d.best_bid(), Some((Price(10), Size(5))));
        assert_eq!(d.best_ask(), Some((Price(12), Size(4))));
        assert_eq!(serde_json::to_string(&d).unwrap(), json);
    }
}
