//! End-of-run summary read back from the prometheus counters.

use prometheus::core::Collector;
use tracing::info;

use crate::metrics::{ORDERS_TOTAL, SKIPPED_TOTAL, STATE_RESETS_TOTAL, TICKS_TOTAL};

/// Totals for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentSummary {
    pub symbol: String,
    pub passive_buy: u64,
    pub passive_sell: u64,
    pub take_buy: u64,
    pub take_sell: u64,
    /// Skips across all reasons.
    pub skipped: u64,
}

/// Totals for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub state_resets: u64,
    pub instruments: Vec<InstrumentSummary>,
}

impl RunSummary {
    /// Read current counter values for `symbols`.
    pub fn collect<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ticks: TICKS_TOTAL.get(),
            state_resets: STATE_RESETS_TOTAL.get(),
            instruments: symbols.into_iter().map(instrument_summary).collect(),
        }
    }

    /// Write the summary to the log.
    pub fn log(&self) {
        info!(
            ticks = self.ticks,
            state_resets = self.state_resets,
            "Run summary"
        );
        for s in &self.instruments {
            info!(
                symbol = %s.symbol,
                passive_buy = s.passive_buy,
                passive_sell = s.passive_sell,
                take_buy = s.take_buy,
                take_sell = s.take_sell,
                skipped = s.skipped,
                "Instrument summary"
            );
        }
    }
}

fn instrument_summary(symbol: &str) -> InstrumentSummary {
    let orders = |kind: &str, side: &str| ORDERS_TOTAL.with_label_values(&[symbol, kind, side]).get();
    InstrumentSummary {
        symbol: symbol.to_string(),
        passive_buy: orders("passive", "buy"),
        passive_sell: orders("passive", "sell"),
        take_buy: orders("take", "buy"),
        take_sell: orders("take", "sell"),
        skipped: skipped_total(symbol),
    }
}

/// Sum of `quoter_skipped_total` over every reason for `symbol`.
fn skipped_total(symbol: &str) -> u64 {
    let mut total = 0;
    for mf in SKIPPED_TOTAL.collect() {
        for m in mf.get_metric() {
            let matches = m
                .get_label()
                .iter()
                .any(|pair| pair.get_name() == "symbol" && pair.get_value() == symbol);
            if matches {
                total += m.get_counter().get_value() as u64;
            }
        }
    }
    total
}
