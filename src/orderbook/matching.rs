//! Matching engine: price-time priority matching with partial fills.
//!
//! The engine sweeps the opposing side's best levels while the taker's
//! limit crosses and quantity remains, walking each level head-first so
//! ties at one price execute in arrival order. Execution price is always
//! the maker's resting price. Fully filled makers are erased from their
//! level and unindexed in a batch once the level borrow ends; emptied
//! levels are dropped before the sweep advances.

use super::book::OrderBook;
use super::order::{Order, Side};
use super::trade::Trade;

/// Price-time priority matcher over one [`OrderBook`].
///
/// The trade-id counter is the only matching state besides the book itself;
/// ids form the strictly increasing sequence 1, 2, 3, … per engine
/// instance.
#[derive(Debug)]
pub struct MatchingEngine {
    next_trade_id: u64,
    /// Scratch list of makers filled at the current level, unindexed in a
    /// batch after each level sweep.
    filled_makers: Vec<u64>,
}

impl MatchingEngine {
    /// Create an engine with its trade counter at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_trade_id: 1,
            filled_makers: Vec::new(),
        }
    }

    /// The id the next produced trade will carry.
    #[must_use]
    pub fn next_trade_id(&self) -> u64 {
        self.next_trade_id
    }

    /// Drive the book toward a non-crossed state with respect to `taker`,
    /// appending trades to `out_trades` in execution order.
    ///
    /// The taker's `remaining` is reduced as it fills; the caller decides
    /// what to do with any residual. Resting orders are never cancelled or
    /// repriced, and a zero-quantity taker produces no trades.
    pub fn process(
        &mut self,
        book: &mut OrderBook,
        taker: &mut Order,
        timestamp: u64,
        out_trades: &mut Vec<Trade>,
    ) {
        let opposite = taker.side.opposite();
        while !taker.is_filled() {
            let best = match opposite {
                Side::Sell => book.best_ask_price(),
                Side::Buy => book.best_bid_price(),
            };
            let Some(level_price) = best else { break };
            let crosses = match taker.side {
                Side::Buy => level_price <= taker.price,
                Side::Sell => level_price >= taker.price,
            };
            if !crosses {
                break;
            }

            let level = book
                .level_mut(opposite, level_price)
                .expect("best price has no level");
            let mut cursor = level.head();
            while let Some(handle) = cursor {
                if taker.is_filled() {
                    break;
                }
                let maker = level.order_mut(handle);
                let maker_id = maker.order_id;
                let quantity = taker.remaining.min(maker.remaining);
                if quantity > 0 {
                    maker.fill(quantity);
                    taker.fill(quantity);
                    out_trades.push(Trade::new(
                        self.next_trade_id,
                        maker_id,
                        taker.order_id,
                        level_price,
                        quantity,
                        timestamp,
                    ));
                    self.next_trade_id += 1;
                }
                if level.order(handle).is_filled() {
                    self.filled_makers.push(maker_id);
                    cursor = level.erase(handle);
                } else {
                    cursor = level.next(handle);
                }
            }
            let level_emptied = level.is_empty();

            for id in self.filled_makers.drain(..) {
                book.unindex(id);
            }
            if level_emptied {
                book.remove_level_if_empty(opposite, level_price);
            }
        }
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}
