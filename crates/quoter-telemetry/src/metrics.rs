//! Prometheus metrics for the quoter.
//!
//! Covers:
//! - Tick throughput
//! - Emitted orders by instrument, kind (passive/take) and side
//! - Skipped instruments and state blob resets
//! - Latest value of every numeric signal the engine records
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on a
//! duplicate metric name, which is a programming error surfaced on first
//! access.

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_gauge_vec,
    Encoder, GaugeVec, HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};
use quoter_core::{metric, DiagnosticsSink};

use crate::error::{TelemetryError, TelemetryResult};

/// Ticks processed.
pub static TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("quoter_ticks_total", "Total ticks processed").unwrap()
});

/// Orders emitted.
/// Labels: symbol, kind (passive/take), side (buy/sell)
pub static ORDERS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quoter_orders_total",
        "Total orders emitted",
        &["symbol", "kind", "side"]
    )
    .unwrap()
});

/// Emitted order sizes.
pub static ORDER_SIZE: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "quoter_order_size",
        "Size of emitted orders in units",
        &["symbol", "kind"],
        vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .unwrap()
});

/// Instruments skipped for a tick.
pub static SKIPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "quoter_skipped_total",
        "Instruments skipped for a tick",
        &["symbol", "reason"]
    )
    .unwrap()
});

/// State blobs discarded because they could not be decoded.
pub static STATE_RESETS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "quoter_state_resets_total",
        "State blobs discarded as unparseable"
    )
    .unwrap()
});

/// Latest value of each engine signal (mid price, moving average, ...).
pub static SIGNAL: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "quoter_signal",
        "Latest engine signal value",
        &["symbol", "metric"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
///
/// Also a `DiagnosticsSink`, so it can be handed straight to the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Metrics;

impl Metrics {
    /// Record a processed tick.
    pub fn tick() {
        TICKS_TOTAL.inc();
    }

    /// Record an emitted order.
    pub fn order(symbol: &str, kind: &str, side: &str, size: f64) {
        ORDERS_TOTAL.with_label_values(&[symbol, kind, side]).inc();
        ORDER_SIZE.with_label_values(&[symbol, kind]).observe(size);
    }

    /// Record a skipped instrument.
    pub fn skipped(symbol: &str, reason: &str) {
        SKIPPED_TOTAL.with_label_values(&[symbol, reason]).inc();
    }

    /// Record a discarded state blob.
    pub fn state_reset() {
        STATE_RESETS_TOTAL.inc();
    }

    /// Update a signal gauge.
    pub fn signal(symbol: &str, name: &str, value: f64) {
        SIGNAL.with_label_values(&[symbol, name]).set(value);
    }

    /// Prometheus text exposition of everything registered.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

/// `(kind, side)` labels for an order metric suffix.
fn order_labels(suffix: &str) -> (&str, &str) {
    match suffix {
        "bid" => ("passive", "buy"),
        "ask" => ("passive", "sell"),
        "take_buy" => ("take", "buy"),
        "take_sell" => ("take", "sell"),
        other => ("other", other),
    }
}

impl DiagnosticsSink for Metrics {
    fn record(&mut self, symbol: &str, name: &str, value: f64) {
        if name == metric::STATE_RESET {
            Self::state_reset();
        } else if let Some(reason) = name.strip_prefix(metric::SKIPPED_PREFIX) {
            Self::skipped(symbol, reason);
        } else if let Some(suffix) = name.strip_prefix(metric::ORDER_PREFIX) {
            let (kind, side) = order_labels(suffix);
            Self::order(symbol, kind, side, value);
        } else if value.is_finite() {
            Self::signal(symbol, name, value);
        }
    }
}
