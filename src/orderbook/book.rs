//! Core OrderBook: sorted price levels per side plus an id → locator index.
//!
//! Bids and asks are `BTreeMap`s keyed by price; bids are read from the
//! back of the map so both sides present their best price first. The
//! `order_index` maps every resting order id to a [`Locator`] so cancel and
//! modify reach the order in O(log P) map steps plus an O(1) in-level hop.
//!
//! The book is purely structural: it never matches, never raises, and is
//! strictly single-threaded.

use super::order::{Order, Side};
use super::price_level::{OrderHandle, PriceLevel};
use std::collections::{BTreeMap, HashMap};
use tracing::{trace, warn};

/// Back-reference from an order id to the order's resting position.
///
/// The `(side, price)` pair names the level and `handle` the slot inside
/// it. The locator never owns the order; whichever operation mutates the
/// level's sequence is responsible for keeping the index in agreement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Locator {
    pub side: Side,
    pub price: i64,
    pub handle: OrderHandle,
    /// Timestamp as of the last insert or modify, kept for audit.
    #[allow(dead_code)]
    pub timestamp: u64,
}

/// The two-sided limit order book.
#[derive(Debug, Default)]
pub struct OrderBook {
    pub(super) bids: BTreeMap<i64, PriceLevel>,
    pub(super) asks: BTreeMap<i64, PriceLevel>,
    pub(super) order_index: HashMap<u64, Locator>,
}

impl OrderBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rest an order at its price level, appending at the tail.
    ///
    /// An order whose id is already resting is ignored with a warning; a
    /// duplicate must not be allowed to leave a stale locator behind.
    pub fn insert(&mut self, order: Order) {
        if self.order_index.contains_key(&order.order_id) {
            warn!("insert ignored: order {} already resting", order.order_id);
            return;
        }
        let (id, side, price, timestamp) = (order.order_id, order.side, order.price, order.timestamp);
        let level = self
            .side_levels_mut(side)
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price));
        let handle = level.add_order(order);
        self.order_index.insert(
            id,
            Locator {
                side,
                price,
                handle,
                timestamp,
            },
        );
        trace!("resting {} order {} at {}", side, id, price);
    }

    /// Best (highest) bid level, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.values().next_back()
    }

    /// Best (lowest) ask level, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.values().next()
    }

    /// Price of the best bid level, if any.
    #[must_use]
    pub fn best_bid_price(&self) -> Option<i64> {
        self.bids.keys().next_back().copied()
    }

    /// Price of the best ask level, if any.
    #[must_use]
    pub fn best_ask_price(&self) -> Option<i64> {
        self.asks.keys().next().copied()
    }

    /// Read-only view of the level at `(side, price)`, if it exists.
    #[must_use]
    pub fn find_level(&self, side: Side, price: i64) -> Option<&PriceLevel> {
        self.side_levels(side).get(&price)
    }

    /// Drop the level at `(side, price)` if it exists and is empty. Idempotent.
    pub fn remove_level_if_empty(&mut self, side: Side, price: i64) {
        let levels = self.side_levels_mut(side);
        if levels.get(&price).is_some_and(PriceLevel::is_empty) {
            levels.remove(&price);
            trace!("removed empty {} level {}", side, price);
        }
    }

    /// The resting order with this id, if any.
    #[must_use]
    pub fn order(&self, order_id: u64) -> Option<&Order> {
        let loc = self.order_index.get(&order_id)?;
        self.find_level(loc.side, loc.price)
            .map(|level| level.order(loc.handle))
    }

    /// True when an order with this id is resting.
    #[must_use]
    pub fn contains(&self, order_id: u64) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Total number of resting orders across both sides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order_index.len()
    }

    /// True when no orders rest on either side.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_index.is_empty()
    }

    /// True when the highest bid meets or exceeds the lowest ask.
    ///
    /// Must be false whenever an ingest operation has returned.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid_price(), self.best_ask_price()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Iterate one side's levels, best price first (bids descending, asks
    /// ascending).
    pub fn levels(&self, side: Side) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match side {
            Side::Buy => Box::new(self.bids.values().rev()),
            Side::Sell => Box::new(self.asks.values()),
        }
    }

    /// Check that the index and the price maps agree: every indexed id
    /// resolves to an order with that id on the locator's side and price,
    /// and every resting order is indexed. Returns false on any
    /// disagreement (a disagreement is a programming bug, not a runtime
    /// condition).
    #[must_use]
    pub fn verify_integrity(&self) -> bool {
        let resting: usize = self
            .bids
            .values()
            .chain(self.asks.values())
            .map(PriceLevel::len)
            .sum();
        if resting != self.order_index.len() {
            return false;
        }
        self.order_index.iter().all(|(id, loc)| {
            self.find_level(loc.side, loc.price).is_some_and(|level| {
                let order = level.order(loc.handle);
                order.order_id == *id && order.side == loc.side && order.price == loc.price
            })
        })
    }

    pub(super) fn side_levels(&self, side: Side) -> &BTreeMap<i64, PriceLevel> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub(super) fn side_levels_mut(&mut self, side: Side) -> &mut BTreeMap<i64, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    pub(crate) fn level_mut(&mut self, side: Side, price: i64) -> Option<&mut PriceLevel> {
        self.side_levels_mut(side).get_mut(&price)
    }

    pub(crate) fn unindex(&mut self, order_id: u64) -> Option<Locator> {
        self.order_index.remove(&order_id)
    }
}
