//! Rolling price volatility per instrument.
//!
//! Volatility is the population standard deviation of the most recent
//! `window` mid prices. Below a full window it is reported as exactly 0:
//! a short window is not trusted, so the spread is never widened on it.
//!
//! Each tick's volatility is also kept in a bounded history (sharing the
//! instrument's `ma_window`) so the quote engine can compare the current
//! reading with its recent mean.

use std::collections::{BTreeMap, VecDeque};

use quoter_core::Symbol;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::history::push_bounded;

/// Default number of samples needed for a volatility reading.
pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;

/// Population standard deviation of the last `window` samples.
///
/// Returns `0.0` when fewer than `window` samples exist. The variance is
/// exact in `Decimal`; when the squared deviations do not fit it is taken
/// in `f64` instead.
pub fn compute_volatility(history: &VecDeque<Decimal>, window: usize) -> f64 {
    if window == 0 || history.len() < window {
        return 0.0;
    }

    let recent: Vec<Decimal> = history.iter().skip(history.len() - window).copied().collect();
    let variance = exact_variance(&recent)
        .and_then(|variance| variance.to_f64())
        .unwrap_or_else(|| approximate_variance(&recent));

    if variance.is_finite() && variance > 0.0 {
        variance.sqrt()
    } else {
        0.0
    }
}

fn exact_variance(samples: &[Decimal]) -> Option<Decimal> {
    let n = Decimal::from(samples.len());
    let mean = samples
        .iter()
        .try_fold(Decimal::ZERO, |sum, p| sum.checked_add(*p))?
        .checked_div(n)?;
    samples
        .iter()
        .try_fold(Decimal::ZERO, |sum, p| {
            let d = p.checked_sub(mean)?;
            sum.checked_add(d.checked_mul(d)?)
        })?
        .checked_div(n)
}

fn approximate_variance(samples: &[Decimal]) -> f64 {
    let values: Vec<f64> = samples.iter().filter_map(|p| p.to_f64()).collect();
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// Snapshot handed to the quote engine after an update.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityStats {
    /// Volatility computed this tick.
    pub current: f64,
    /// Mean of the retained volatility history (including `current`).
    pub mean: Option<f64>,
    /// Number of retained volatility samples.
    pub sample_count: usize,
}

impl Default for VolatilityStats {
    fn default() -> Self {
        Self {
            current: 0.0,
            mean: None,
            sample_count: 0,
        }
    }
}

impl VolatilityStats {
    /// `current / mean`, or 1 when the mean is zero (or there is no history).
    pub fn factor(&self) -> f64 {
        match self.mean {
            Some(mean) if mean > 0.0 => self.current / mean,
            _ => 1.0,
        }
    }
}

/// Per-instrument history of volatility readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolatilityTracker {
    samples: BTreeMap<Symbol, VecDeque<f64>>,
}

impl VolatilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `symbol` has a (possibly empty) history.
    pub fn ensure(&mut self, symbol: &str) {
        if !self.samples.contains_key(symbol) {
            self.samples.insert(symbol.to_string(), VecDeque::new());
        }
    }

    /// Record a reading and return the updated stats.
    ///
    /// Non-finite readings are stored as 0 so the history always encodes.
    pub fn update(&mut self, symbol: &str, value: f64, ma_window: usize) -> VolatilityStats {
        let value = if value.is_finite() { value } else { 0.0 };
        let history = self.samples.entry(symbol.to_string()).or_default();
        push_bounded(history, value, ma_window);
        VolatilityStats {
            current: value,
            mean: mean_f64(history),
            sample_count: history.len(),
        }
    }

    /// Mean of the retained readings. `None` when empty.
    pub fn mean(&self, symbol: &str) -> Option<f64> {
        self.samples.get(symbol).and_then(mean_f64)
    }

    /// Retained readings, oldest first.
    pub fn window(&self, symbol: &str) -> Option<&VecDeque<f64>> {
        self.samples.get(symbol)
    }

    pub fn len(&self, symbol: &str) -> usize {
        self.samples.get(symbol).map(VecDeque::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn mean_f64(values: &VecDeque<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prices(values: &[i64]) -> VecDeque<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_zero_below_window() {
        let history = prices(&[10, 12, 9, 15, 11]);
        assert_eq!(compute_volatility(&history, 20), 0.0);
        assert_eq!(compute_volatility(&VecDeque::new(), 20), 0.0);
    }

    #[test]
    fn test_population_std_dev() {
        // 2, 4, 4, 4, 5, 5, 7, 9: mean 5, population std dev 2
        let history = prices(&[2, 4, 4, 4, 5, 5, 7, 9]);
        let vol = compute_volatility(&history, 8);
        assert!((vol - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_uses_only_most_recent_window() {
        // Old outliers are outside the window
        let history = prices(&[1000, -1000, 2, 4, 4, 4, 5, 5, 7, 9]);
        let vol = compute_volatility(&history, 8);
        assert!((vol - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_prices_exactly_zero() {
        let history: VecDeque<Decimal> = std::iter::repeat(dec!(10000.5)).take(20).collect();
        assert_eq!(compute_volatility(&history, 20), 0.0);
    }

    #[test]
    fn test_wide_prices_fall_back_to_f64() {
        // Deviations of ~5e14 square past Decimal::MAX
        let history: VecDeque<Decimal> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    dec!(2)
                } else {
                    dec!(1000000000000001)
                }
            })
            .collect();
        assert!(exact_variance(&history.iter().copied().collect::<Vec<_>>()).is_none());

        let vol = compute_volatility(&history, 20);
        // Two alternating values: sigma is half their distance
        let expected = 499_999_999_999_999.5;
        assert!((vol - expected).abs() / expected < 1e-9, "vol {vol}");
    }

    #[test]
    fn test_unsummable_window_is_finite() {
        let history: VecDeque<Decimal> = std::iter::repeat(Decimal::MAX).take(20).collect();
        let vol = compute_volatility(&history, 20);
        assert!(vol.is_finite());
        assert!(vol >= 0.0);
    }

    #[test]
    fn test_tracker_bounded_by_ma_window() {
        let mut tracker = VolatilityTracker::new();
        for i in 0..25 {
            let stats = tracker.update("KELP", i as f64, 10);
            assert!(stats.sample_count <= 10);
        }
        assert_eq!(tracker.len("KELP"), 10);
        // 15..=24 retained
        assert_eq!(tracker.mean("KELP"), Some(19.5));
    }

    #[test]
    fn test_factor_zero_mean_is_one() {
        let mut tracker = VolatilityTracker::new();
        let stats = tracker.update("KELP", 0.0, 10);
        assert_eq!(stats.mean, Some(0.0));
        assert_eq!(stats.factor(), 1.0);
        assert_eq!(VolatilityStats::default().factor(), 1.0);
    }

    #[test]
    fn test_factor_relative_to_mean() {
        let mut tracker = VolatilityTracker::new();
        tracker.update("KELP", 1.0, 10);
        let stats = tracker.update("KELP", 3.0, 10);
        // mean = 2, current = 3
        assert!((stats.factor() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_stored_as_zero() {
        let mut tracker = VolatilityTracker::new();
        let stats = tracker.update("KELP", f64::NAN, 10);
        assert_eq!(stats.current, 0.0);
        assert_eq!(tracker.window("KELP").unwrap()[0], 0.0);
    }
}
