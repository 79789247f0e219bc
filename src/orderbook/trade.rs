//! Trade record emitted by the matching engine.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One execution between a resting maker and an incoming taker.
///
/// Immutable once produced. `price` is always the maker's resting price and
/// `timestamp` is the logical timestamp of the event that triggered the
/// match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonically increasing id, starting at 1 per engine instance.
    pub trade_id: u64,
    /// The resting order whose liquidity was consumed.
    pub maker_order_id: u64,
    /// The incoming order that crossed the book.
    pub taker_order_id: u64,
    /// Execution price (the maker's price).
    pub price: i64,
    /// Executed quantity.
    pub quantity: u64,
    /// Logical timestamp of the triggering event.
    pub timestamp: u64,
}

impl Trade {
    /// Create a new trade record.
    #[must_use]
    pub fn new(
        trade_id: u64,
        maker_order_id: u64,
        taker_order_id: u64,
        price: i64,
        quantity: u64,
        timestamp: u64,
    ) -> Self {
        Self {
            trade_id,
            maker_order_id,
            taker_order_id,
            price,
            quantity,
            timestamp,
        }
    }

    /// Equality under the replay-verification projection: same maker, taker,
    /// price, and quantity. `trade_id` and `timestamp` are not compared.
    #[must_use]
    pub fn matches(&self, other: &Trade) -> bool {
        self.maker_order_id == other.maker_order_id
            && self.taker_order_id == other.taker_order_id
            && self.price == other.price
            && self.quantity == other.quantity
    }
}

/// Callback invoked for every produced trade, shared across threads.
///
/// Used by the concurrent wrappers to hand trades out of the worker.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ignores_trade_id_and_timestamp() {
        let a = Trade::new(1, 10, 20, 100, 5, 7);
        let b = Trade::new(99, 10, 20, 100, 5, 1234);
        assert!(a.matches(&b));
    }

    #[test]
    fn test_matches_rejects_differing_fill() {
        let a = Trade::new(1, 10, 20, 100, 5, 7);
        assert!(!a.matches(&Trade::new(1, 11, 20, 100, 5, 7)));
        assert!(!a.matches(&Trade::new(1, 10, 21, 100, 5, 7)));
        assert!(!a.matches(&Trade::new(1, 10, 20, 101, 5, 7)));
        assert!(!a.matches(&Trade::new(1, 10, 20, 100, 6, 7)));
    }
}
