//! Property tests over random event streams: structural invariants,
//! conservation of quantity, FIFO discipline, and replay idempotence.

use matchbook::replay::{encode_event, encode_trade, replay_reader};
use matchbook::{Event, EventIngestor, EventPayload, Order, OrderBook, Side, Trade};
use proptest::prelude::*;
use std::collections::HashMap;
use std::io::Cursor;

#[derive(Debug, Clone)]
enum Op {
    New { buy: bool, price: i64, quantity: u64 },
    Cancel { slot: usize },
    Modify { slot: usize, price: i64, quantity: u64 },
}

/// Random op streams over a narrow price band so orders actually interact.
/// `slot` values are folded over the ids issued so far, so cancels and
/// modifies hit a mix of live, filled, and never-existing orders.
fn arb_ops(max_len: usize, with_modify: bool) -> BoxedStrategy<Vec<Op>> {
    let new = (any::<bool>(), 95i64..=105i64, 1u64..=20u64)
        .prop_map(|(buy, price, quantity)| Op::New {
            buy,
            price,
            quantity,
        });
    let cancel = (0usize..64).prop_map(|slot| Op::Cancel { slot });
    if with_modify {
        let modify = (0usize..64, 95i64..=105i64, 1u64..=20u64).prop_map(
            |(slot, price, quantity)| Op::Modify {
                slot,
                price,
                quantity,
            },
        );
        prop::collection::vec(prop_oneof![4 => new, 1 => cancel, 1 => modify], 1..max_len).boxed()
    } else {
        prop::collection::vec(prop_oneof![4 => new, 1 => cancel], 1..max_len).boxed()
    }
}

fn build_events(ops: &[Op]) -> Vec<Event> {
    let mut events = Vec::with_capacity(ops.len());
    let mut next_order_id = 1u64;
    for (i, op) in ops.iter().enumerate() {
        let event_id = i as u64 + 1;
        let payload = match op {
            Op::New {
                buy,
                price,
                quantity,
            } => {
                let side = if *buy { Side::Buy } else { Side::Sell };
                let order = Order::new(next_order_id, side, *price, *quantity, event_id);
                next_order_id += 1;
                EventPayload::NewOrder(order)
            }
            Op::Cancel { slot } => EventPayload::Cancel {
                order_id: *slot as u64 % next_order_id,
            },
            Op::Modify {
                slot,
                price,
                quantity,
            } => EventPayload::Modify {
                order_id: *slot as u64 % next_order_id,
                new_price: *price,
                new_quantity: *quantity,
            },
        };
        events.push(Event::new(event_id, event_id, payload));
    }
    events
}

fn fill_projection(trades: &[Trade]) -> Vec<(u64, u64, i64, u64)> {
    trades
        .iter()
        .map(|t| (t.maker_order_id, t.taker_order_id, t.price, t.quantity))
        .collect()
}

type BookSnapshot = Vec<(i64, Vec<(u64, u64, u64, u64)>)>;

/// Full structural picture of both sides, best-first, with per-order state.
fn snapshot(book: &OrderBook) -> (BookSnapshot, BookSnapshot) {
    let side_snapshot = |side| {
        book.levels(side)
            .map(|level| {
                (
                    level.price(),
                    level
                        .iter()
                        .map(|o| (o.order_id, o.quantity, o.remaining, o.timestamp))
                        .collect(),
                )
            })
            .collect()
    };
    (side_snapshot(Side::Buy), side_snapshot(Side::Sell))
}

proptest! {
    /// After every event the index agrees with the maps, the
    /// book is not crossed, and trade ids are strictly increasing.
    #[test]
    fn prop_structural_invariants(ops in arb_ops(60, true)) {
        let events = build_events(&ops);
        let mut ingestor = EventIngestor::new();
        let mut last_trade_id = 0u64;

        for event in &events {
            let trades = ingestor.process(event);
            prop_assert!(ingestor.book().verify_integrity());
            prop_assert!(!ingestor.book().is_crossed());
            for trade in &trades {
                prop_assert!(trade.trade_id > last_trade_id);
                prop_assert!(trade.quantity > 0);
                last_trade_id = trade.trade_id;
            }
        }
    }

    /// Twice the traded quantity equals the total filled quantity
    /// summed over every order that ever entered the book. Modifies are
    /// excluded because they redefine an order's original quantity.
    #[test]
    fn prop_conservation(ops in arb_ops(60, false)) {
        let events = build_events(&ops);
        let mut ingestor = EventIngestor::new();

        let mut original: HashMap<u64, u64> = HashMap::new();
        let mut final_remaining: HashMap<u64, u64> = HashMap::new();
        let mut traded = 0u64;

        for event in &events {
            if let EventPayload::Cancel { order_id } = &event.payload {
                // Capture the remaining quantity the cancel removes.
                if let Some(order) = ingestor.book().order(*order_id) {
                    final_remaining.insert(*order_id, order.remaining);
                }
            }
            if let EventPayload::NewOrder(order) = &event.payload {
                original.insert(order.order_id, order.quantity);
            }
            for trade in ingestor.process(event) {
                traded += trade.quantity;
            }
        }
        for id in original.keys() {
            if let Some(order) = ingestor.book().order(*id) {
                final_remaining.insert(*id, order.remaining);
            }
        }

        let filled: u64 = original
            .iter()
            .map(|(id, quantity)| quantity - final_remaining.get(id).copied().unwrap_or(0))
            .sum();
        prop_assert_eq!(filled, traded * 2);
    }

    /// The same event sequence always produces the same trade stream,
    /// and a log of the run replays clean.
    #[test]
    fn prop_replay_idempotent(ops in arb_ops(40, true)) {
        let events = build_events(&ops);

        let run = |events: &[Event]| -> Vec<Trade> {
            let mut ingestor = EventIngestor::new();
            events.iter().flat_map(|e| ingestor.process(e)).collect()
        };
        let first = run(&events);
        let second = run(&events);
        prop_assert_eq!(fill_projection(&first), fill_projection(&second));

        // Encode the session as a log and verify it replays trade-for-trade.
        let mut log = String::new();
        let mut ingestor = EventIngestor::new();
        for event in &events {
            if let Some(line) = encode_event(event) {
                log.push_str(&line);
                log.push('\n');
            }
            for trade in ingestor.process(event) {
                log.push_str(&encode_trade(&trade));
                log.push('\n');
            }
        }
        let summary = replay_reader(Cursor::new(log));
        prop_assert!(summary.is_ok());
    }

    /// Pure quantity modifies never reorder a level's FIFO sequence.
    #[test]
    fn prop_fifo_stable_under_in_place_modify(
        inserts in prop::collection::vec(1u64..=20, 1..20),
        tweaks in prop::collection::vec((0usize..20, 1u64..=20), 0..10),
    ) {
        let mut book = OrderBook::new();
        for (i, quantity) in inserts.iter().enumerate() {
            let id = i as u64 + 1;
            book.insert(Order::new(id, Side::Buy, 100, *quantity, id));
        }
        for (slot, quantity) in &tweaks {
            let id = (*slot as u64 % inserts.len() as u64) + 1;
            book.modify(id, 100, *quantity, 1000);
        }

        let level = book.find_level(Side::Buy, 100).unwrap();
        let ids: Vec<u64> = level.iter().map(|o| o.order_id).collect();
        let expected: Vec<u64> = (1..=inserts.len() as u64).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Cancel and modify on unknown ids leave the book identical.
    #[test]
    fn prop_unknown_id_safety(ops in arb_ops(40, false), bogus in 100_000u64..200_000) {
        let events = build_events(&ops);
        let mut ingestor = EventIngestor::new();
        for event in &events {
            ingestor.process(event);
        }

        let before = snapshot(ingestor.book());
        ingestor.process(&Event::new(9999, 9999, EventPayload::Cancel { order_id: bogus }));
        ingestor.process(&Event::new(
            10000,
            10000,
            EventPayload::Modify { order_id: bogus, new_price: 1, new_quantity: 1 },
        ));
        let after = snapshot(ingestor.book());
        prop_assert_eq!(before, after);
    }
}
