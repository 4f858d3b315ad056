//! Bounded mid-price windows per instrument.
//!
//! The moving average over the retained window is the engine's fair-value
//! estimate. Windows only change when the instrument has a two-sided book.

use std::collections::{BTreeMap, VecDeque};

use quoter_core::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Append `value` and evict from the front until `len <= max_len`.
pub(crate) fn push_bounded<T>(window: &mut VecDeque<T>, value: T, max_len: usize) {
    window.push_back(value);
    let max_len = max_len.max(1);
    while window.len() > max_len {
        window.pop_front();
    }
}

/// Arithmetic mean of a price window.
///
/// `None` when the window is empty or its sum does not fit a `Decimal`.
pub(crate) fn mean(window: &VecDeque<Decimal>) -> Option<Decimal> {
    if window.is_empty() {
        return None;
    }
    let sum = window
        .iter()
        .try_fold(Decimal::ZERO, |sum, price| sum.checked_add(*price))?;
    sum.checked_div(Decimal::from(window.len()))
}

/// Per-instrument mid-price history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistoryStore {
    windows: BTreeMap<Symbol, VecDeque<Decimal>>,
}

impl PriceHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `symbol` has a (possibly empty) window.
    pub fn ensure(&mut self, symbol: &str) {
        if !self.windows.contains_key(symbol) {
            self.windows.insert(symbol.to_string(), VecDeque::new());
        }
    }

    /// Record a mid price and return the moving average of the retained window.
    ///
    /// Falls back to `mid_price` itself when the window cannot be averaged.
    pub fn update(&mut self, symbol: &str, mid_price: Decimal, ma_window: usize) -> Decimal {
        let window = self.windows.entry(symbol.to_string()).or_default();
        push_bounded(window, mid_price, ma_window);
        mean(window).unwrap_or(mid_price)
    }

    /// Retained samples, oldest first.
    pub fn window(&self, symbol: &str) -> Option<&VecDeque<Decimal>> {
        self.windows.get(symbol)
    }

    /// Moving average without recording anything. `None` when no samples.
    pub fn moving_average(&self, symbol: &str) -> Option<Decimal> {
        self.windows.get(symbol).and_then(mean)
    }

    /// Number of retained samples for `symbol`.
    pub fn len(&self, symbol: &str) -> usize {
        self.windows.get(symbol).map(VecDeque::len).unwrap_or(0)
    }

    /// Whether every non-empty window has a moving average.
    pub fn is_averageable(&self) -> bool {
        self.windows
            .values()
            .all(|window| window.is_empty() || mean(window).is_some())
    }

    /// Whether no instrument has been seen.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.windows.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_update_average_is_sample() {
        let mut store = PriceHistoryStore::new();
        let ma = store.update("KELP", dec!(11), 10);
        assert_eq!(ma, dec!(11));
        assert_eq!(store.len("KELP"), 1);
    }

    #[test]
    fn test_moving_average() {
        let mut store = PriceHistoryStore::new();
        store.update("KELP", dec!(10), 10);
        store.update("KELP", dec!(11), 10);
        let ma = store.update("KELP", dec!(12.5), 10);
        // (10 + 11 + 12.5) / 3
        assert_eq!(ma.round_dp(4), dec!(11.1667));
        assert_eq!(store.moving_average("KELP"), Some(ma));
    }

    #[test]
    fn test_rolling_window_eviction() {
        let mut store = PriceHistoryStore::new();
        for i in 1..=5 {
            store.update("KELP", Decimal::from(i), 3);
        }
        // Only 3, 4, 5 retained
        let window: Vec<Decimal> = store.window("KELP").unwrap().iter().copied().collect();
        assert_eq!(window, vec![dec!(3), dec!(4), dec!(5)]);
        assert_eq!(store.moving_average("KELP"), Some(dec!(4)));
    }

    #[test]
    fn test_window_shrinks_when_config_shrinks() {
        let mut store = PriceHistoryStore::new();
        for i in 0..10 {
            store.update("KELP", Decimal::from(i), 10);
        }
        assert_eq!(store.len("KELP"), 10);
        store.update("KELP", dec!(100), 4);
        assert_eq!(store.len("KELP"), 4);
    }

    #[test]
    fn test_bound_holds_for_every_update_count() {
        for window in 1..6 {
            let mut store = PriceHistoryStore::new();
            for n in 0..20 {
                store.update("RAINFOREST_RESIN", Decimal::from(n), window);
                assert!(store.len("RAINFOREST_RESIN") <= window);
            }
        }
    }

    #[test]
    fn test_instruments_are_independent() {
        let mut store = PriceHistoryStore::new();
        store.update("KELP", dec!(10), 10);
        store.update("RAINFOREST_RESIN", dec!(10000), 10);
        assert_eq!(store.moving_average("KELP"), Some(dec!(10)));
        assert_eq!(store.moving_average("RAINFOREST_RESIN"), Some(dec!(10000)));
        assert_eq!(store.moving_average("SQUID_INK"), None);
    }

    #[test]
    fn test_unsummable_window_has_no_average() {
        let mut store = PriceHistoryStore::new();
        store.update("KELP", Decimal::MAX, 10);
        assert_eq!(store.moving_average("KELP"), Some(Decimal::MAX));
        assert!(store.is_averageable());

        // The sum overflows: no average, the new sample stands in
        let ma = store.update("KELP", Decimal::MAX, 10);
        assert_eq!(ma, Decimal::MAX);
        assert_eq!(store.moving_average("KELP"), None);
        assert!(!store.is_averageable());

        let ma = store.update("KELP", dec!(11), 1);
        assert_eq!(ma, dec!(11));
        assert!(store.is_averageable());
    }

    #[test]
    fn test_ensure_creates_empty_window() {
        let mut store = PriceHistoryStore::new();
        store.ensure("KELP");
        assert_eq!(store.len("KELP"), 0);
        assert!(store.window("KELP").unwrap().is_empty());
        assert_eq!(store.moving_average("KELP"), None);
    }
}
