//! Codec for the state blob carried between ticks.
//!
//! The blob is a JSON object:
//!
//! ```text
//! {"price_history": {"KELP": ["2021", "2021.5"]},
//!  "volatility_history": {"KELP": [0.0, 0.0]}}
//! ```
//!
//! Prices are encoded as decimal strings and volatilities as JSON numbers
//! (serde_json's `float_roundtrip` keeps them bit-exact), so decoding an
//! encoded state returns it unchanged. A blob that fails to parse, or whose
//! price windows cannot be averaged, is treated as absent.

use quoter_core::{Result, Symbol};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::history::PriceHistoryStore;
use crate::volatility::VolatilityTracker;

/// How a state blob was turned back into state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Empty blob (first tick): fresh state.
    Fresh,
    /// Blob parsed.
    Restored,
    /// Blob unparseable or out of range: fresh state.
    Reset,
}

/// The only state that survives between ticks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub price_history: PriceHistoryStore,
    #[serde(default)]
    pub volatility_history: VolatilityTracker,
}

impl PersistedState {
    /// Empty histories for each of `symbols`.
    pub fn empty_for<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> Self {
        let mut state = Self::default();
        for symbol in symbols {
            state.price_history.ensure(symbol);
            state.volatility_history.ensure(symbol);
        }
        state
    }

    /// Decode `blob`; `symbols` are the instruments in this tick's book and
    /// only matter when starting fresh.
    pub fn decode<'a>(
        blob: &str,
        symbols: impl IntoIterator<Item = &'a Symbol>,
    ) -> (Self, DecodeOutcome) {
        if blob.trim().is_empty() {
            return (Self::empty_for(symbols), DecodeOutcome::Fresh);
        }
        match serde_json::from_str::<Self>(blob) {
            Ok(state) if state.price_history.is_averageable() => (state, DecodeOutcome::Restored),
            Ok(_) => {
                warn!(blob_len = blob.len(), "State blob prices out of range, starting fresh");
                (Self::empty_for(symbols), DecodeOutcome::Reset)
            }
            Err(e) => {
                warn!(error = %e, blob_len = blob.len(), "Unparseable state blob, starting fresh");
                (Self::empty_for(symbols), DecodeOutcome::Reset)
            }
        }
    }

    /// Encode to the blob handed back to the caller.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
