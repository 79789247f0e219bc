//! Order book operations addressed by order id: cancel and modify.

use super::book::{Locator, OrderBook};
use tracing::trace;

impl OrderBook {
    /// Cancel a resting order by id.
    ///
    /// Returns false (a no-op) when the id is unknown, so out-of-order or
    /// duplicated cancels are tolerated. Drops the order's level if it
    /// became empty.
    pub fn cancel(&mut self, order_id: u64) -> bool {
        let Some(loc) = self.order_index.remove(&order_id) else {
            trace!("cancel for unknown order {}", order_id);
            return false;
        };
        let level = self
            .level_mut(loc.side, loc.price)
            .expect("order index references a missing level");
        level.erase(loc.handle);
        self.remove_level_if_empty(loc.side, loc.price);
        trace!("cancelled order {} at {}", order_id, loc.price);
        true
    }

    /// Modify a resting order's price and/or quantity.
    ///
    /// The already-filled amount is preserved: the new remaining is
    /// `new_quantity - filled`. A modify that would shrink the total below
    /// the filled amount is rejected (returns false, order untouched).
    ///
    /// With the price unchanged the order is updated in place and keeps its
    /// position in the level's FIFO sequence, so pure quantity changes do
    /// not forfeit time priority. A price change moves the order to the
    /// tail of the new level under `new_timestamp`.
    ///
    /// Returns false when the id is unknown.
    pub fn modify(
        &mut self,
        order_id: u64,
        new_price: i64,
        new_quantity: u64,
        new_timestamp: u64,
    ) -> bool {
        let Some(loc) = self.order_index.get(&order_id).copied() else {
            trace!("modify for unknown order {}", order_id);
            return false;
        };
        let level = self
            .level_mut(loc.side, loc.price)
            .expect("order index references a missing level");
        let order = level.order_mut(loc.handle);
        let filled = order.filled();
        if new_quantity <= filled {
            trace!(
                "modify rejected for order {}: new quantity {} within filled {}",
                order_id, new_quantity, filled
            );
            return false;
        }

        if new_price == order.price {
            order.quantity = new_quantity;
            order.remaining = new_quantity - filled;
            order.timestamp = new_timestamp;
            if let Some(loc) = self.order_index.get_mut(&order_id) {
                loc.timestamp = new_timestamp;
            }
            trace!("modified order {} in place at {}", order_id, new_price);
            return true;
        }

        // Price changed: re-rest at the tail of the new level, losing time
        // priority.
        let mut moved = *order;
        moved.price = new_price;
        moved.quantity = new_quantity;
        moved.remaining = new_quantity - filled;
        moved.timestamp = new_timestamp;

        level.erase(loc.handle);
        self.remove_level_if_empty(loc.side, loc.price);

        let new_level = self
            .side_levels_mut(loc.side)
            .entry(new_price)
            .or_insert_with(|| super::price_level::PriceLevel::new(new_price));
        let handle = new_level.add_order(moved);
        self.order_index.insert(
            order_id,
            Locator {
                side: loc.side,
                price: new_price,
                handle,
                timestamp: new_timestamp,
            },
        );
        trace!(
            "moved order {} from {} to {}",
            order_id, loc.price, new_price
        );
        true
    }
}
