//! Tick replay loop.
//!
//! Reads one JSON `TradingState` per line, runs the engine, and writes one
//! line per tick. The engine's blob is threaded forward: only the first
//! tick's `trader_data` comes from the input, later ones are replaced by
//! what the engine returned on the previous tick.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use quoter_core::{Symbol, TickOutput, TradingState};
use quoter_mm::Trader;
use quoter_telemetry::{Metrics, RunSummary, TickLogger};
use tracing::{debug, info};

/// Main application.
pub struct Application {
    config: AppConfig,
    trader: Trader,
    logger: TickLogger,
    /// Blob returned by the previous tick; `None` before the first tick.
    blob: Option<String>,
    ticks: u64,
    symbols: BTreeSet<Symbol>,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let trader = config.trader()?;
        let logger = TickLogger::new(config.logger.max_log_length);
        Ok(Self {
            config,
            trader,
            logger,
            blob: None,
            ticks: 0,
            symbols: BTreeSet::new(),
        })
    }

    /// Ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Every instrument seen so far.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Run one tick and return the engine output with the line to write.
    pub fn step(&mut self, mut input: TradingState) -> AppResult<(TickOutput, String)> {
        if let Some(blob) = self.blob.take() {
            input.trader_data = blob;
        }
        self.symbols.extend(input.order_depths.keys().cloned());

        let output = {
            let mut sink = (Metrics, &mut self.logger);
            self.trader.run(&input, &mut sink)
        };
        Metrics::tick();
        self.ticks += 1;

        let line = if self.config.logger.enabled {
            self.logger.flush(&input, &output)?
        } else {
            self.logger.clear();
            serde_json::to_string(&output).map_err(|source| AppError::Json {
                line: self.ticks as usize,
                source,
            })?
        };

        debug!(
            timestamp = input.timestamp,
            orders = output.order_count(),
            blob_len = output.trader_data.len(),
            "Tick processed"
        );

        self.blob = Some(output.trader_data.clone());
        Ok((output, line))
    }

    /// Replay every tick from `reader`, writing one line per tick to `writer`.
    ///
    /// Blank lines are skipped. Returns the number of ticks processed.
    pub fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> AppResult<u64> {
        let start = self.ticks;
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let input: TradingState = serde_json::from_str(&line).map_err(|source| {
                AppError::Json {
                    line: index + 1,
                    source,
                }
            })?;
            let (_, out) = self.step(input)?;
            writeln!(writer, "{out}")?;
        }
        writer.flush()?;

        let processed = self.ticks - start;
        info!(ticks = processed, instruments = self.symbols.len(), "Replay finished");
        Ok(processed)
    }

    /// Per-instrument totals for everything seen so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary::collect(self.symbols.iter().map(String::as_str))
    }
}
