//! Position-aware sizing.
//!
//! The position is supplied by the exchange each tick; this module only
//! derives headroom, skew and order sizes from it.

use quoter_core::{OrderSide, Size};
use rust_decimal::prelude::{Signed, ToPrimitive};
use rust_decimal::Decimal;

use crate::quote_engine::QuoteLevel;

/// Current position against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inventory {
    /// Net signed position (positive = long).
    pub position: i64,
    /// Absolute position limit (> 0).
    pub limit: i64,
}

impl Inventory {
    pub fn new(position: i64, limit: i64) -> Self {
        Self { position, limit }
    }

    /// Units we may still buy.
    pub fn headroom_buy(&self) -> i64 {
        self.limit.saturating_sub(self.position)
    }

    /// Units we may still sell.
    pub fn headroom_sell(&self) -> i64 {
        self.limit.saturating_add(self.position)
    }

    pub fn headroom(&self, side: OrderSide) -> i64 {
        match side {
            OrderSide::Buy => self.headroom_buy(),
            OrderSide::Sell => self.headroom_sell(),
        }
    }

    /// `|position| / limit`: 0 when flat, 1 at the limit.
    pub fn position_factor(&self) -> Decimal {
        if self.limit <= 0 {
            return Decimal::ONE;
        }
        Decimal::from(self.position.unsigned_abs()) / Decimal::from(self.limit)
    }

    /// `1 - |position| / limit`: shrinks order sizes toward the limit.
    pub fn position_scalar(&self) -> Decimal {
        Decimal::ONE - self.position_factor()
    }

    /// -1, 0 or 1 following the position.
    pub fn skew_sign(&self) -> Decimal {
        Decimal::from(self.position).signum()
    }

    /// Passive quote size for one side.
    ///
    /// `min(available, max(1, trunc(headroom × scalar)))`. The floor of 1
    /// keeps a near-limit inventory quoting; only a side with no headroom
    /// gets 0.
    pub fn quote_size(&self, side: OrderSide, available: Size) -> Size {
        let headroom = self.headroom(side);
        if headroom <= 0 || !available.is_positive() {
            return Size::ZERO;
        }
        let scaled = Decimal::from(headroom)
            .checked_mul(self.position_scalar())
            .and_then(|size| size.trunc().to_i64())
            .unwrap_or(0)
            .max(1);
        available.min(Size(scaled))
    }

    /// Size for crossing the spread against `resting` units.
    pub fn take_size(&self, side: OrderSide, resting: Size) -> Size {
        resting.min(Size(self.headroom(side))).max(Size::ZERO)
    }
}

/// Trim a passive quote so that it and a take order on the same side fit in
/// `headroom` together. The take order keeps its size.
pub fn cap_jointly(
    passive: Option<QuoteLevel>,
    take: Option<&QuoteLevel>,
    headroom: i64,
) -> Option<QuoteLevel> {
    let taken = take.map(|t| t.size).unwrap_or(Size::ZERO);
    let remaining = Size(headroom).saturating_sub(taken).max(Size::ZERO);
    passive.and_then(|mut quote| {
        quote.size = quote.size.min(remaining);
        quote.size.is_positive().then_some(quote)
    })
}
