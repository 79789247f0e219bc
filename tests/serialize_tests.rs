//! Round-trip tests for the serde representations of the public model
//! types.

use matchbook::{Event, EventPayload, Metrics, Order, Side, Trade};

#[test]
fn test_order_json_round_trip() {
    let order = Order::new(7, Side::Sell, -150, 40, 9);
    let json = serde_json::to_string(&order).unwrap();
    let back: Order = serde_json::from_str(&json).unwrap();
    assert_eq!(back, order);
}

#[test]
fn test_partially_filled_order_keeps_remaining() {
    let mut order = Order::new(7, Side::Buy, 100, 40, 9);
    order.fill(15);
    let back: Order = serde_json::from_str(&serde_json::to_string(&order).unwrap()).unwrap();
    assert_eq!(back.remaining, 25);
    assert_eq!(back.quantity, 40);
}

#[test]
fn test_event_json_round_trip() {
    let events = [
        Event::new(1, 2, EventPayload::NewOrder(Order::new(3, Side::Buy, 4, 5, 6))),
        Event::new(2, 3, EventPayload::Cancel { order_id: 3 }),
        Event::new(
            3,
            4,
            EventPayload::Modify {
                order_id: 3,
                new_price: 7,
                new_quantity: 8,
            },
        ),
        Event::new(4, 5, EventPayload::Trade(Trade::new(1, 2, 3, 4, 5, 6))),
        Event::new(5, 6, EventPayload::Empty),
    ];
    for event in events {
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

#[test]
fn test_metrics_serializes_counters() {
    let metrics = Metrics {
        orders_ingested: 1,
        trades_executed: 2,
        cancels: 3,
        modifies: 4,
    };
    let json = serde_json::to_value(&metrics).unwrap();
    assert_eq!(json["orders_ingested"], 1);
    assert_eq!(json["modifies"], 4);
}
