//! Event ingestion: turns the typed event stream into ordered book
//! mutations and a trade stream.
//!
//! The ingestor is not authoritative for event ordering; it applies events
//! in exactly the order it is handed them. The trade stream is a pure
//! function of (empty book, event sequence), which is what the replay
//! contract verifies.

use super::event::{Event, EventPayload};
use crate::metrics::Metrics;
use crate::orderbook::{MatchingEngine, Order, OrderBook, Trade};
use tracing::trace;

/// Dispatches events into one book/engine pair and accumulates [`Metrics`].
#[derive(Debug, Default)]
pub struct EventIngestor {
    book: OrderBook,
    engine: MatchingEngine,
    metrics: Metrics,
}

impl EventIngestor {
    /// Create an ingestor over an empty book with a fresh trade counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the trades it produced.
    ///
    /// A new order is run through the matching engine as a taker; its
    /// residual, if any, is rested on the book under the event's timestamp.
    /// Cancel and modify are soft operations whose booleans are swallowed
    /// (unknown ids are tolerated, never fatal). Trade and empty payloads
    /// are no-ops in the live path.
    pub fn process(&mut self, event: &Event) -> Vec<Trade> {
        let mut trades = Vec::new();
        match &event.payload {
            EventPayload::NewOrder(order) => {
                let mut taker = *order;
                self.engine
                    .process(&mut self.book, &mut taker, event.timestamp, &mut trades);
                if !taker.is_filled() {
                    self.book.insert(Order::new(
                        taker.order_id,
                        taker.side,
                        taker.price,
                        taker.remaining,
                        event.timestamp,
                    ));
                }
                self.metrics.orders_ingested += 1;
                self.metrics.trades_executed += trades.len() as u64;
                trace!(
                    "event {} matched order {} into {} trade(s)",
                    event.event_id,
                    taker.order_id,
                    trades.len()
                );
            }
            EventPayload::Cancel { order_id } => {
                let _ = self.book.cancel(*order_id);
                self.metrics.cancels += 1;
            }
            EventPayload::Modify {
                order_id,
                new_price,
                new_quantity,
            } => {
                let _ = self
                    .book
                    .modify(*order_id, *new_price, *new_quantity, event.timestamp);
                self.metrics.modifies += 1;
            }
            // Recorded trades are cross-checked by replay, not re-applied.
            EventPayload::Trade(_) => {}
            EventPayload::Empty => {}
        }
        trades
    }

    /// The book this ingestor mutates.
    #[must_use]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// Mutable access to the book, for seeding and inspection.
    pub fn book_mut(&mut self) -> &mut OrderBook {
        &mut self.book
    }

    /// Counters accumulated since construction or the last reset.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Reset the counters; the book and trade ids are untouched.
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }
}
