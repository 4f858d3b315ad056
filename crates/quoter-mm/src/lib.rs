//! Per-tick market-making decision engine.
//!
//! Provides:
//! - Bounded price/volatility windows per instrument
//! - Volatility-adjusted spread with inventory skew
//! - Position-aware sizing and threshold-based liquidity taking
//! - Codec for the opaque state blob carried between ticks
//! - A take-only fair-value variant selected by `StrategyKind`
//!
//! # Architecture
//!
//! ```text
//! TradingState ─→ Trader.run()
//!                  ├─ PersistedState::decode(trader_data)
//!                  ├─ per instrument:
//!                  │    ├─ PriceHistoryStore.update(mid) → moving average
//!                  │    ├─ VolatilityTracker.update(σ)
//!                  │    ├─ compute_quotes(): passive bid/ask
//!                  │    ├─ find_takes(): cross when mispriced by > 2%
//!                  │    └─ LimitPolicy: cap passive size by remaining headroom
//!                  └─ PersistedState::encode() → trader_data′
//! ```

pub mod codec;
pub mod config;
pub mod fair_value;
pub mod history;
pub mod inventory;
pub mod quote_engine;
pub mod taker;
pub mod trader;
pub mod volatility;

pub use codec::{DecodeOutcome, PersistedState};
pub use config::{InstrumentConfig, InstrumentTable, LimitPolicy, StrategyConfig, StrategyKind};
pub use history::PriceHistoryStore;
pub use inventory::Inventory;
pub use quote_engine::{compute_quotes, QuoteLevel, QuotePair};
pub use taker::{find_takes, TakeDecision};
pub use trader::Trader;
pub use volatility::{compute_volatility, VolatilityStats, VolatilityTracker};
