//! Event model: the closed set of inputs the ingestor consumes.

use crate::orderbook::{Order, Trade};
use serde::{Deserialize, Serialize};

/// Payload of one input event.
///
/// A closed tagged union; the ingestor dispatches by case analysis and
/// nothing else is ever added at runtime. `Trade` appears so a mixed log of
/// events and trades can be treated homogeneously; it is inert in the live
/// path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// An event with nothing to apply.
    Empty,
    /// An incoming limit order, run through the matching engine.
    NewOrder(Order),
    /// Cancel request for a resting order.
    Cancel {
        /// Id of the order to remove.
        order_id: u64,
    },
    /// Modify request for a resting order.
    Modify {
        /// Id of the order to change.
        order_id: u64,
        /// New limit price; a change re-queues the order at the new level.
        new_price: i64,
        /// New total quantity; the already-filled amount is preserved.
        new_quantity: u64,
    },
    /// A previously recorded trade, used only for replay cross-checks.
    Trade(Trade),
}

/// One element of the serialized event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event id assigned by the producer.
    pub event_id: u64,
    /// Logical timestamp; stamped onto trades and residual orders.
    pub timestamp: u64,
    /// What to apply.
    pub payload: EventPayload,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(event_id: u64, timestamp: u64, payload: EventPayload) -> Self {
        Self {
            event_id,
            timestamp,
            payload,
        }
    }
}
