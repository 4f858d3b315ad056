//! Strategy configuration and the per-instrument parameter table.

use std::collections::BTreeMap;

use quoter_core::{CoreError, Result, Symbol};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::volatility::DEFAULT_VOLATILITY_WINDOW;

/// Which decision engine runs each tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Volatility-adjusted quoting with inventory skew plus opportunistic taking.
    #[default]
    Adaptive,
    /// Take-only: cross whenever the book is on the wrong side of the moving average.
    FairValue,
}

/// How the passive and taking paths share the position limit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Take orders claim headroom first; the passive quote on the same side
    /// gets whatever is left. Combined size never exceeds headroom.
    #[default]
    Joint,
    /// Each path is sized on its own. The matching system enforces the limit.
    Independent,
}

/// Static parameters for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Number of mid prices (and volatility samples) retained.
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,

    /// Maximum absolute position.
    #[serde(default = "default_position_limit")]
    pub position_limit: i64,

    /// Fraction of the market spread we quote (lower = tighter).
    #[serde(default = "default_spread_factor")]
    pub spread_factor: Decimal,

    /// Widen the spread when current volatility exceeds its recent mean.
    #[serde(default)]
    pub volatility_adjust: bool,

    /// Samples needed before volatility is reported as non-zero.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            ma_window: default_ma_window(),
            position_limit: default_position_limit(),
            spread_factor: default_spread_factor(),
            volatility_adjust: false,
            volatility_window: default_volatility_window(),
        }
    }
}

impl InstrumentConfig {
    /// Reject parameters the engine cannot work with.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.ma_window == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "{name}: ma_window must be at least 1"
            )));
        }
        if self.position_limit <= 0 {
            return Err(CoreError::InvalidConfig(format!(
                "{name}: position_limit must be positive, got {}",
                self.position_limit
            )));
        }
        if self.spread_factor.is_sign_negative() {
            return Err(CoreError::InvalidConfig(format!(
                "{name}: spread_factor must not be negative, got {}",
                self.spread_factor
            )));
        }
        if self.volatility_window == 0 {
            return Err(CoreError::InvalidConfig(format!(
                "{name}: volatility_window must be at least 1"
            )));
        }
        Ok(())
    }
}

fn default_ma_window() -> usize {
    20
}
fn default_position_limit() -> i64 {
    50
}
fn default_spread_factor() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_volatility_window() -> usize {
    DEFAULT_VOLATILITY_WINDOW
}

/// Strategy configuration as loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyConfig {
    #[serde(default)]
    pub kind: StrategyKind,

    #[serde(default)]
    pub limit_policy: LimitPolicy,

    /// Parameters for instruments without their own entry.
    #[serde(default)]
    pub defaults: InstrumentConfig,

    /// Per-instrument overrides. Fields left out take the built-in defaults.
    #[serde(default)]
    pub instruments: BTreeMap<Symbol, InstrumentConfig>,
}

impl StrategyConfig {
    /// Validate and freeze the instrument table.
    pub fn instrument_table(&self) -> Result<InstrumentTable> {
        InstrumentTable::new(self.defaults.clone(), self.instruments.clone())
    }
}

/// Immutable instrument -> parameters mapping with an explicit default entry.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentTable {
    default: InstrumentConfig,
    entries: BTreeMap<Symbol, InstrumentConfig>,
}

impl InstrumentTable {
    pub fn new(
        default: InstrumentConfig,
        entries: BTreeMap<Symbol, InstrumentConfig>,
    ) -> Result<Self> {
        default.validate("defaults")?;
        for (symbol, config) in &entries {
            config.validate(symbol)?;
        }
        Ok(Self { default, entries })
    }

    /// Parameters for `symbol`, falling back to the default entry.
    pub fn get(&self, symbol: &str) -> &InstrumentConfig {
        self.entries.get(symbol).unwrap_or(&self.default)
    }

    pub fn default_config(&self) -> &InstrumentConfig {
        &self.default
    }

    /// Whether `symbol` has its own entry.
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }
}

impl Default for InstrumentTable {
    fn default() -> Self {
        Self {
            default: InstrumentConfig::default(),
            entries: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = InstrumentConfig::default();
        assert_eq!(config.ma_window, 20);
        assert_eq!(config.position_limit, 50);
        assert_eq!(config.spread_factor, dec!(0.5));
        assert!(!config.volatility_adjust);
        assert_eq!(config.volatility_window, 20);
    }

    #[test]
    fn test_config_serde_defaults() {
        let toml_str = r#"
kind = "adaptive"

[instruments.KELP]
ma_window = 10
spread_factor = 0.3
volatility_adjust = true
"#;
        let config: StrategyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.kind, StrategyKind::Adaptive);
        assert_eq!(config.limit_policy, LimitPolicy::Joint);
        let kelp = &config.instruments["KELP"];
        assert_eq!(kelp.ma_window, 10);
        assert_eq!(kelp.position_limit, 50);
        assert_eq!(kelp.spread_factor, dec!(0.3));
        assert!(kelp.volatility_adjust);
    }

    #[test]
    fn test_policy_and_kind_names() {
        let toml_str = r#"
kind = "fair_value"
limit_policy = "independent"
"#;
        let config: StrategyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.kind, StrategyKind::FairValue);
        assert_eq!(config.limit_policy, LimitPolicy::Independent);
    }

    #[test]
    fn test_unknown_instrument_uses_default_entry() {
        let mut entries = BTreeMap::new();
        entries.insert(
            "KELP".to_string(),
            InstrumentConfig {
                ma_window: 10,
                ..Default::default()
            },
        );
        let table = InstrumentTable::new(InstrumentConfig::default(), entries).unwrap();
        assert_eq!(table.get("KELP").ma_window, 10);
        assert_eq!(table.get("SQUID_INK").ma_window, 20);
        assert!(!table.contains("SQUID_INK"));
    }

    #[test]
    fn test_validation_rejects_zero_limit() {
        let bad = InstrumentConfig {
            position_limit: 0,
            ..Default::default()
        };
        let mut entries = BTreeMap::new();
        entries.insert("KELP".to_string(), bad);
        let err = InstrumentTable::new(InstrumentConfig::default(), entries).unwrap_err();
        assert!(err.to_string().contains("KELP"));
    }

    #[test]
    fn test_validation_rejects_empty_window() {
        let bad = InstrumentConfig {
            ma_window: 0,
            ..Default::default()
        };
        assert!(bad.validate("defaults").is_err());
    }
}
