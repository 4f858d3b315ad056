//! Tick replay harness for the quoter market-making engine.
//!
//! Feeds `TradingState` snapshots through the engine one at a time:
//! - Loads the strategy and logger configuration
//! - Threads the engine's state blob from each tick into the next
//! - Writes one visualizer line (or raw output) per tick
//! - Feeds prometheus metrics and an end-of-run summary

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
