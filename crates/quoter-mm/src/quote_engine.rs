//! Quote price calculation engine.
//!
//! Computes a passive bid/ask pair from:
//! - Mid price of the current book
//! - Market spread scaled by `spread_factor`
//! - Volatility adjustment (current reading vs. its recent mean)
//! - Inventory skew (shift both quotes toward reducing the position)
//!
//! Quotes never improve on the touch: the bid is clamped to at most the
//! best bid and the ask to at least the best ask. Prices are rounded down
//! to integers; since the clamped prices sit at or outside integer touch
//! prices, rounding down can never make a quote marketable.

use quoter_core::{OrderSide, Price, Size, TopOfBook};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::InstrumentConfig;
use crate::inventory::Inventory;
use crate::volatility::VolatilityStats;

/// Weight of the volatility factor in the spread multiplier.
const VOLATILITY_WEIGHT: Decimal = dec!(0.5);

/// A single quote (one side). `size` is unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteLevel {
    pub price: Price,
    pub size: Size,
}

impl QuoteLevel {
    pub fn new(price: i64, size: i64) -> Self {
        Self {
            price: Price(price),
            size: Size(size),
        }
    }
}

/// Computed quotes for an instrument (both sides).
///
/// Prices that do not fit a `Decimal` are `None` and their side is not
/// quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotePair {
    /// Bid to place, if any.
    pub bid: Option<QuoteLevel>,
    /// Ask to place, if any.
    pub ask: Option<QuoteLevel>,
    /// Spread after volatility adjustment.
    pub adjusted_spread: Option<Decimal>,
    /// Bid price before rounding (after clamping).
    pub bid_price: Option<Decimal>,
    /// Ask price before rounding (after clamping).
    pub ask_price: Option<Decimal>,
}

/// Round a computed price down to an integer price.
///
/// Returns `None` when the price does not fit an `i64`.
pub fn floor_price(price: Decimal) -> Option<Price> {
    price.floor().to_i64().map(Price)
}

/// `(best_ask - best_bid) × spread_factor`, widened by
/// `1 + 0.5 × volatility_factor` when volatility adjustment is on and a
/// volatility history exists. `None` on overflow.
pub fn adjusted_spread(
    top: &TopOfBook,
    config: &InstrumentConfig,
    volatility: &VolatilityStats,
) -> Option<Decimal> {
    let base_spread = Decimal::from(top.spread()).checked_mul(config.spread_factor)?;
    if !config.volatility_adjust || volatility.sample_count == 0 {
        return Some(base_spread);
    }
    let factor = Decimal::from_f64(volatility.factor()).unwrap_or(Decimal::ONE);
    let multiplier = VOLATILITY_WEIGHT
        .checked_mul(factor)?
        .checked_add(Decimal::ONE)?;
    base_spread.checked_mul(multiplier)
}

/// Unrounded `(bid, ask)` after skew and clamping to the touch.
fn skewed_prices(
    top: &TopOfBook,
    spread: Decimal,
    inventory: &Inventory,
) -> (Option<Decimal>, Option<Decimal>) {
    let mid = top.mid_price();
    let half_spread = spread / Decimal::TWO;

    // Long: both quotes move down (eager to sell). Short: both move up.
    let Some(position_adjustment) = spread
        .checked_mul(inventory.position_factor())
        .map(|adjustment| adjustment * inventory.skew_sign())
    else {
        return (None, None);
    };

    let bid = mid
        .checked_sub(half_spread)
        .and_then(|price| price.checked_sub(position_adjustment))
        .map(|price| price.min(top.best_bid.to_decimal()));
    let ask = mid
        .checked_add(half_spread)
        .and_then(|price| price.checked_sub(position_adjustment))
        .map(|price| price.max(top.best_ask.to_decimal()));
    (bid, ask)
}

/// Calculate passive quotes for a single instrument.
///
/// # Arguments
/// * `top` - Current top of book (both sides present)
/// * `inventory` - Position and limit
/// * `config` - Instrument parameters
/// * `volatility` - Stats after this tick's volatility update
///
/// # Returns
/// QuotePair with at most one bid and one ask. A side is `None` when its
/// size is zero, its price is not positive, it would cross the book, or its
/// price overflowed.
pub fn compute_quotes(
    top: &TopOfBook,
    inventory: &Inventory,
    config: &InstrumentConfig,
    volatility: &VolatilityStats,
) -> QuotePair {
    let spread = adjusted_spread(top, config, volatility);
    let (bid_price, ask_price) = match spread {
        Some(spread) => skewed_prices(top, spread, inventory),
        None => (None, None),
    };

    let buy_size = inventory.quote_size(OrderSide::Buy, top.ask_volume);
    let sell_size = inventory.quote_size(OrderSide::Sell, top.bid_volume);

    let bid = bid_price
        .and_then(floor_price)
        .filter(|px| buy_size.is_positive() && px.is_positive() && *px < top.best_ask)
        .map(|price| QuoteLevel {
            price,
            size: buy_size,
        });

    let ask = ask_price
        .and_then(floor_price)
        .filter(|px| sell_size.is_positive() && px.is_positive() && *px > top.best_bid)
        .map(|price| QuoteLevel {
            price,
            size: sell_size,
        });

    QuotePair {
        bid,
        ask,
        adjusted_spread: spread,
        bid_price,
        ask_price,
    }
}
