//! Core domain types for the quoter market-making engine.
//!
//! This crate provides the types exchanged with the simulated exchange each tick:
//! - `Price` / `Size`: Integer tick and lot units
//! - `OrderDepth`: Resting order book for one instrument (price -> signed size)
//! - `Order`: Quote or take intent (signed quantity encodes side)
//! - `TradingState` / `TickOutput`: Per-tick input and output
//! - `DiagnosticsSink`: Boundary for `(symbol, metric, value)` trace events

pub mod book;
pub mod diagnostics;
pub mod error;
pub mod order;
pub mod state;
pub mod units;

pub use book::{BookState, OrderDepth, TopOfBook};
pub use diagnostics::{metric, DiagnosticsSink, NullSink};
pub use error::{CoreError, Result};
pub use order::{Order, OrderSide, Symbol};
pub use state::{TickOutput, Trade, TradingState};
pub use units::{Price, Size};
