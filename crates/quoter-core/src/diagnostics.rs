//! Diagnostics boundary between the engine and whatever consumes its traces.
//!
//! The engine emits `(symbol, metric, value)` events and free-form notes.
//! It never depends on how (or whether) they are consumed.

/// Metric names emitted by the engine.
///
/// Names starting with [`metric::SKIPPED_PREFIX`] mark an instrument skipped
/// for the reason that follows; names starting with [`metric::ORDER_PREFIX`]
/// carry the size of an emitted order of that kind.
pub mod metric {
    pub const MID_PRICE: &str = "mid_price";
    pub const MOVING_AVERAGE: &str = "moving_average";
    pub const VOLATILITY: &str = "volatility";
    pub const VOLATILITY_FACTOR: &str = "volatility_factor";
    pub const ADJUSTED_SPREAD: &str = "adjusted_spread";
    pub const POSITION: &str = "position";
    pub const BID_PRICE: &str = "bid_price";
    pub const ASK_PRICE: &str = "ask_price";
    pub const ACCEPTABLE_PRICE: &str = "acceptable_price";
    /// Recorded with an empty symbol when the state blob had to be discarded.
    pub const STATE_RESET: &str = "state_reset";

    pub const SKIPPED_PREFIX: &str = "skipped_";
    pub const SKIPPED_BOOK_UNQUOTABLE: &str = "skipped_book_unquotable";
    pub const SKIPPED_NO_FAIR_VALUE: &str = "skipped_no_fair_value";

    pub const ORDER_PREFIX: &str = "order_";
    pub const ORDER_BID: &str = "order_bid";
    pub const ORDER_ASK: &str = "order_ask";
    pub const ORDER_TAKE_BUY: &str = "order_take_buy";
    pub const ORDER_TAKE_SELL: &str = "order_take_sell";
}

/// Receiver for engine trace events.
pub trait DiagnosticsSink {
    /// Record a numeric observation for an instrument.
    fn record(&mut self, symbol: &str, metric: &str, value: f64);

    /// Record a human-readable trace line for an instrument.
    fn note(&mut self, _symbol: &str, _line: &str) {}
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _symbol: &str, _metric: &str, _value: f64) {}
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut T {
    fn record(&mut self, symbol: &str, metric: &str, value: f64) {
        (**self).record(symbol, metric, value);
    }

    fn note(&mut self, symbol: &str, line: &str) {
        (**self).note(symbol, line);
    }
}

/// Fan out to two sinks.
impl<A: DiagnosticsSink, B: DiagnosticsSink> DiagnosticsSink for (A, B) {
    fn record(&mut self, symbol: &str, metric: &str, value: f64) {
        self.0.record(symbol, metric, value);
        self.1.record(symbol, metric, value);
    }

    fn note(&mut self, symbol: &str, line: &str) {
        self.0.note(symbol, line);
        self.1.note(symbol, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        records: Vec<(String, String, f64)>,
        notes: Vec<String>,
    }

    impl DiagnosticsSink for Recorder {
        fn record(&mut self, symbol: &str, metric: &str, value: f64) {
            self.records
                .push((symbol.to_string(), metric.to_string(), value));
        }

        fn note(&mut self, _symbol: &str, line: &str) {
            self.notes.push(line.to_string());
        }
    }

    #[test]
    fn test_fanout_reaches_both() {
        let mut sink = (Recorder::default(), Recorder::default());
        sink.record("KELP", "mid_price", 11.0);
        sink.note("KELP", "hello");
        assert_eq!(sink.0.records.len(), 1);
        assert_eq!(sink.1.records[0].2, 11.0);
        assert_eq!(sink.1.notes, vec!["hello".to_string()]);
    }

    #[test]
    fn test_null_sink_as_trait_object() {
        let mut null = NullSink;
        let sink: &mut dyn DiagnosticsSink = &mut null;
        sink.record("KELP", "mid_price", 1.0);
        sink.note("KELP", "ignored");
    }
}
