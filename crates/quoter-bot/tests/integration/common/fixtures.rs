//! Tick fixtures written as JSONL, the way the harness reads them.

use std::io::Write;

use quoter_core::{OrderDepth, TradingState};
use tempfile::NamedTempFile;

/// A snapshot with one two-sided book level per instrument.
pub fn snapshot(timestamp: i64, books: &[(&str, i64, i64)], positions: &[(&str, i64)]) -> TradingState {
    TradingState {
        timestamp,
        order_depths: books
            .iter()
            .map(|(symbol, bid, ask)| {
                (
                    symbol.to_string(),
                    OrderDepth::new([(*bid, 20)], [(*ask, -20)]),
                )
            })
            .collect(),
        position: positions.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
        ..Default::default()
    }
}

/// Write `ticks` to a temporary JSONL file.
pub fn write_ticks(ticks: &[TradingState]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for tick in ticks {
        writeln!(file, "{}", serde_json::to_string(tick).unwrap()).unwrap();
    }
    file.flush().unwrap();
    file
}

/// Write TOML to a temporary config file.
pub fn write_config(toml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
