//! Per-tick orchestration.
//!
//! `Trader::run` is the whole tick: decode the blob, decide orders for every
//! instrument in the book, encode the updated state. `Trader::decide` is the
//! same step with the cross-tick state passed explicitly.

use std::collections::BTreeMap;

use quoter_core::{
    metric, DiagnosticsSink, Order, OrderDepth, OrderSide, Result, Symbol, TickOutput,
    TradingState,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::codec::{DecodeOutcome, PersistedState};
use crate::config::{InstrumentTable, LimitPolicy, StrategyConfig, StrategyKind};
use crate::fair_value::{acceptable_price, fair_value_orders};
use crate::inventory::{cap_jointly, Inventory};
use crate::quote_engine::{compute_quotes, QuoteLevel};
use crate::taker::find_takes;
use crate::volatility::compute_volatility;

/// Stateless decision engine. All cross-tick memory lives in the blob.
#[derive(Debug, Clone)]
pub struct Trader {
    kind: StrategyKind,
    limit_policy: LimitPolicy,
    table: InstrumentTable,
}

impl Trader {
    /// Validate the configuration and build the engine.
    pub fn new(config: &StrategyConfig) -> Result<Self> {
        Ok(Self::with_table(
            config.kind,
            config.limit_policy,
            config.instrument_table()?,
        ))
    }

    pub fn with_table(kind: StrategyKind, limit_policy: LimitPolicy, table: InstrumentTable) -> Self {
        Self {
            kind,
            limit_policy,
            table,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn limit_policy(&self) -> LimitPolicy {
        self.limit_policy
    }

    pub fn table(&self) -> &InstrumentTable {
        &self.table
    }

    /// Run one tick.
    pub fn run(&self, input: &TradingState, sink: &mut dyn DiagnosticsSink) -> TickOutput {
        let (state, outcome) = PersistedState::decode(&input.trader_data, input.symbols());
        if outcome == DecodeOutcome::Reset {
            sink.record("", metric::STATE_RESET, 1.0);
            sink.note("", "state blob rejected, histories reset");
        }

        let (orders, state) = self.decide(input, state, sink);

        let trader_data = match state.encode() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, timestamp = input.timestamp, "Failed to encode state, dropping history");
                String::new()
            }
        };

        TickOutput {
            orders,
            conversions: 0,
            trader_data,
        }
    }

    /// `(input, state) -> (orders, state')`.
    ///
    /// Every instrument in the book gets an entry in the returned map, empty
    /// when nothing is emitted for it.
    pub fn decide(
        &self,
        input: &TradingState,
        mut state: PersistedState,
        sink: &mut dyn DiagnosticsSink,
    ) -> (BTreeMap<Symbol, Vec<Order>>, PersistedState) {
        let mut orders = BTreeMap::new();
        for (symbol, depth) in &input.order_depths {
            let position = input.position_of(symbol);
            let emitted = match self.kind {
                StrategyKind::Adaptive => self.adaptive(symbol, depth, position, &mut state, sink),
                StrategyKind::FairValue => self.fair_value(symbol, depth, position, &mut state, sink),
            };
            orders.insert(symbol.clone(), emitted);
        }
        (orders, state)
    }

    fn adaptive(
        &self,
        symbol: &str,
        depth: &OrderDepth,
        position: i64,
        state: &mut PersistedState,
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<Order> {
        let config = self.table.get(symbol);

        let Some(top) = depth.top_of_book() else {
            let book_state = depth.state();
            debug!(symbol = %symbol, book = %book_state, "Skipping instrument without two-sided book");
            sink.record(symbol, metric::SKIPPED_BOOK_UNQUOTABLE, 1.0);
            sink.note(symbol, &format!("{symbol}: book {book_state}, no quotes"));
            return Vec::new();
        };

        let mid = top.mid_price();
        let moving_average = state.price_history.update(symbol, mid, config.ma_window);
        let volatility = state
            .price_history
            .window(symbol)
            .map(|window| compute_volatility(window, config.volatility_window))
            .unwrap_or(0.0);
        let stats = state
            .volatility_history
            .update(symbol, volatility, config.ma_window);

        let inventory = Inventory::new(position, config.position_limit);
        let quotes = compute_quotes(&top, &inventory, config, &stats);
        let takes = find_takes(&top, moving_average, &inventory);

        let (bid, ask) = match self.limit_policy {
            LimitPolicy::Joint => (
                cap_jointly(quotes.bid, takes.buy.as_ref(), inventory.headroom_buy()),
                cap_jointly(quotes.ask, takes.sell.as_ref(), inventory.headroom_sell()),
            ),
            LimitPolicy::Independent => (quotes.bid, quotes.ask),
        };

        sink.record(symbol, metric::MID_PRICE, decimal_value(mid));
        sink.record(symbol, metric::MOVING_AVERAGE, decimal_value(moving_average));
        sink.record(symbol, metric::VOLATILITY, stats.current);
        sink.record(symbol, metric::VOLATILITY_FACTOR, stats.factor());
        sink.record(symbol, metric::POSITION, position as f64);
        for (name, value) in [
            (metric::ADJUSTED_SPREAD, quotes.adjusted_spread),
            (metric::BID_PRICE, quotes.bid_price),
            (metric::ASK_PRICE, quotes.ask_price),
        ] {
            if let Some(value) = value {
                sink.record(symbol, name, decimal_value(value));
            }
        }

        sink.note(
            symbol,
            &format!(
                "{symbol} market: bid {} x {}, ask {} x {}, mid {mid:.2}, position {position}",
                top.best_bid, top.best_bid_size, top.best_ask, top.best_ask_size
            ),
        );
        sink.note(
            symbol,
            &format!(
                "{symbol} analysis: ma {moving_average:.2}, volatility {:.2}, factor {:.2}",
                stats.current,
                stats.factor()
            ),
        );
        sink.note(
            symbol,
            &format!(
                "{symbol} pricing: bid {}, ask {}, spread {}",
                price_text(quotes.bid_price),
                price_text(quotes.ask_price),
                price_text(quotes.adjusted_spread)
            ),
        );

        debug!(
            symbol = %symbol,
            mid = %mid,
            moving_average = %moving_average,
            volatility = stats.current,
            adjusted_spread = ?quotes.adjusted_spread,
            position = position,
            bid = ?bid,
            ask = ?ask,
            take_buy = ?takes.buy,
            take_sell = ?takes.sell,
            "Instrument decision"
        );

        let mut orders = Vec::with_capacity(4);
        emit(&mut orders, symbol, OrderSide::Buy, bid, metric::ORDER_BID, sink);
        emit(&mut orders, symbol, OrderSide::Sell, ask, metric::ORDER_ASK, sink);
        emit(&mut orders, symbol, OrderSide::Buy, takes.buy, metric::ORDER_TAKE_BUY, sink);
        emit(&mut orders, symbol, OrderSide::Sell, takes.sell, metric::ORDER_TAKE_SELL, sink);
        orders
    }

    fn fair_value(
        &self,
        symbol: &str,
        depth: &OrderDepth,
        position: i64,
        state: &mut PersistedState,
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<Order> {
        let config = self.table.get(symbol);

        let Some(acceptable) = acceptable_price(symbol, depth, config, &mut state.price_history)
        else {
            debug!(symbol = %symbol, book = %depth.state(), "No fair value yet, skipping");
            sink.record(symbol, metric::SKIPPED_NO_FAIR_VALUE, 1.0);
            return Vec::new();
        };

        let inventory = Inventory::new(position, config.position_limit);
        let orders = fair_value_orders(symbol, depth, &inventory, acceptable);

        sink.record(symbol, metric::ACCEPTABLE_PRICE, decimal_value(acceptable));
        sink.record(symbol, metric::POSITION, position as f64);
        for order in &orders {
            let name = match order.side() {
                OrderSide::Buy => metric::ORDER_TAKE_BUY,
                OrderSide::Sell => metric::ORDER_TAKE_SELL,
            };
            sink.record(symbol, name, order.size().inner() as f64);
            sink.note(symbol, &order.to_string());
        }
        debug!(symbol = %symbol, acceptable = %acceptable, orders = orders.len(), "Fair value decision");
        orders
    }
}

fn emit(
    orders: &mut Vec<Order>,
    symbol: &str,
    side: OrderSide,
    level: Option<QuoteLevel>,
    name: &str,
    sink: &mut dyn DiagnosticsSink,
) {
    if let Some(level) = level {
        let order = Order::new(symbol, side, level.price, level.size);
        sink.record(symbol, name, level.size.inner() as f64);
        sink.note(symbol, &order.to_string());
        orders.push(order);
    }
}

fn decimal_value(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn price_text(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}
