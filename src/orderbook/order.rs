//! Order model: the value record for a single limit order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The side of an order or price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid side.
    Buy,
    /// Ask side.
    Sell,
}

impl Side {
    /// Returns the side an incoming order of this side matches against.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// One-letter code used by the log and CSV formats.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Side::Buy => 'B',
            Side::Sell => 'S',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Buy"),
            Side::Sell => write!(f, "Sell"),
        }
    }
}

/// A single limit order.
///
/// Prices are signed integers; tick size and currency scaling are the
/// caller's responsibility. `timestamp` is a caller-supplied logical value
/// used for time-priority audit, never read from a clock.
///
/// `remaining` starts equal to `quantity` and only moves toward zero through
/// [`fill`](Order::fill); `0 <= remaining <= quantity` holds at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier across the book.
    pub order_id: u64,
    /// Buy or Sell.
    pub side: Side,
    /// Limit price.
    pub price: i64,
    /// Original quantity.
    pub quantity: u64,
    /// Quantity still unfilled.
    pub remaining: u64,
    /// Logical timestamp assigned by the caller.
    pub timestamp: u64,
}

impl Order {
    /// Create a new, fully unfilled order.
    #[must_use]
    pub fn new(order_id: u64, side: Side, price: i64, quantity: u64, timestamp: u64) -> Self {
        Self {
            order_id,
            side,
            price,
            quantity,
            remaining: quantity,
            timestamp,
        }
    }

    /// Reduce `remaining` by up to `n` and return the amount actually taken.
    pub fn fill(&mut self, n: u64) -> u64 {
        let taken = n.min(self.remaining);
        self.remaining -= taken;
        taken
    }

    /// True once `remaining` has reached zero.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Quantity already executed against this order.
    #[must_use]
    pub fn filled(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }
}
