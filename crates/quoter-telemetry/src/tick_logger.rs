//! Visualizer output: one compact JSON array per tick.
//!
//! ```text
//! [compressed_state, compressed_orders, conversions, trader_data, logs]
//! ```
//!
//! `compressed_state` is `[timestamp, trader_data, listings, order_depths,
//! own_trades, market_trades, position, observations]`, with listings and
//! observations left empty. Trades are `[symbol, price, quantity, buyer,
//! seller, timestamp]` and orders `[symbol, price, quantity]`.
//!
//! The line is kept under `max_log_length` by truncating the three
//! free-form strings (input blob, output blob, log text) to an equal share
//! of whatever the fixed part leaves.

use quoter_core::{DiagnosticsSink, TickOutput, Trade, TradingState};
use serde_json::{json, Map, Value};

use crate::error::TelemetryResult;

/// Default cap on a visualizer line.
pub const DEFAULT_MAX_LOG_LENGTH: usize = 3750;

const ELLIPSIS: &str = "...";

/// Collects engine notes for one tick and renders the visualizer line.
#[derive(Debug, Clone)]
pub struct TickLogger {
    max_log_length: usize,
    lines: Vec<String>,
}

impl Default for TickLogger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LOG_LENGTH)
    }
}

impl TickLogger {
    pub fn new(max_log_length: usize) -> Self {
        Self {
            max_log_length,
            lines: Vec::new(),
        }
    }

    /// Notes collected since the last flush.
    pub fn pending(&self) -> &[String] {
        &self.lines
    }

    /// Drop the collected notes without rendering.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Render the line for this tick and clear the collected notes.
    pub fn flush(&mut self, state: &TradingState, output: &TickOutput) -> TelemetryResult<String> {
        let logs = self.lines.join("\n");
        self.lines.clear();

        let base_length = serde_json::to_string(&json!([
            compress_state(state, ""),
            compress_orders(output),
            output.conversions,
            "",
            "",
        ]))?
        .len();
        let max_item_length = self.max_log_length.saturating_sub(base_length) / 3;

        let line = serde_json::to_string(&json!([
            compress_state(state, &truncate(&state.trader_data, max_item_length)),
            compress_orders(output),
            output.conversions,
            truncate(&output.trader_data, max_item_length),
            truncate(&logs, max_item_length),
        ]))?;
        Ok(line)
    }
}

impl DiagnosticsSink for TickLogger {
    // Numeric signals reach the log through the engine's market/analysis/pricing notes.
    fn record(&mut self, _symbol: &str, _metric: &str, _value: f64) {}

    fn note(&mut self, _symbol: &str, line: &str) {
        self.lines.push(line.to_string());
    }
}

fn compress_state(state: &TradingState, trader_data: &str) -> Value {
    let order_depths: Map<String, Value> = state
        .order_depths
        .iter()
        .map(|(symbol, depth)| {
            (
                symbol.clone(),
                json!([depth.buy_orders, depth.sell_orders]),
            )
        })
        .collect();

    json!([
        state.timestamp,
        trader_data,
        [],
        order_depths,
        compress_trades(state.own_trades.values().flatten()),
        compress_trades(state.market_trades.values().flatten()),
        state.position,
        [{}, {}],
    ])
}

fn compress_trades<'a>(trades: impl Iterator<Item = &'a Trade>) -> Value {
    trades
        .map(|t| {
            json!([
                t.symbol,
                t.price,
                t.quantity,
                t.buyer,
                t.seller,
                t.timestamp
            ])
        })
        .collect()
}

fn compress_orders(output: &TickOutput) -> Value {
    output
        .iter_orders()
        .map(|o| json!([o.symbol, o.price, o.quantity]))
        .collect()
}

/// Cut `value` to at most `max_length` characters, marking the cut with `...`
/// when there is room for it.
fn truncate(value: &str, max_length: usize) -> String {
    if value.chars().count() <= max_length {
        return value.to_string();
    }
    if max_length < ELLIPSIS.len() {
        return value.chars().take(max_length).collect();
    }
    let keep = max_length - ELLIPSIS.len();
    let mut out: String = value.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
