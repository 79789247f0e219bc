//! Text codec for the event/trade log.
//!
//! One record per line, whitespace-separated, integers in base 10, side as
//! `B`/`S`:
//!
//! ```text
//! E <event_id> <timestamp> NEWORDER <order_id> <B|S> <price> <quantity> <order_ts>
//! E <event_id> <timestamp> CANCEL <order_id>
//! E <event_id> <timestamp> MODIFY <order_id> <new_price> <new_quantity>
//! T <trade_id> <timestamp> <maker_id> <taker_id> <price> <quantity>
//! ```

use super::error::ReplayError;
use crate::ingest::event::{Event, EventPayload};
use crate::orderbook::{Order, Side, Trade};
use std::str::FromStr;

/// One decoded log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// An `E` line: an event to re-apply.
    Event(Event),
    /// A `T` line: a recorded trade to verify against.
    Trade(Trade),
}

/// Encode an event as a log line (without trailing newline).
///
/// Returns `None` for an empty payload, which has no textual form. An
/// event carrying a trade payload encodes as a `T` line.
#[must_use]
pub fn encode_event(event: &Event) -> Option<String> {
    match &event.payload {
        EventPayload::NewOrder(order) => Some(format!(
            "E {} {} NEWORDER {} {} {} {} {}",
            event.event_id,
            event.timestamp,
            order.order_id,
            order.side.as_char(),
            order.price,
            order.quantity,
            order.timestamp,
        )),
        EventPayload::Cancel { order_id } => Some(format!(
            "E {} {} CANCEL {}",
            event.event_id, event.timestamp, order_id
        )),
        EventPayload::Modify {
            order_id,
            new_price,
            new_quantity,
        } => Some(format!(
            "E {} {} MODIFY {} {} {}",
            event.event_id, event.timestamp, order_id, new_price, new_quantity
        )),
        EventPayload::Trade(trade) => Some(encode_trade(trade)),
        EventPayload::Empty => None,
    }
}

/// Encode a trade as a `T` line (without trailing newline).
#[must_use]
pub fn encode_trade(trade: &Trade) -> String {
    format!(
        "T {} {} {} {} {} {}",
        trade.trade_id,
        trade.timestamp,
        trade.maker_order_id,
        trade.taker_order_id,
        trade.price,
        trade.quantity,
    )
}

/// Decode one log line.
///
/// Returns `Ok(None)` for blank lines. Anything else that does not match
/// the grammar is a [`ReplayError::Parse`] carrying `line_number`.
pub fn parse_record(line: &str, line_number: u64) -> Result<Option<LogRecord>, ReplayError> {
    let mut tokens = line.split_whitespace();
    let Some(tag) = tokens.next() else {
        return Ok(None);
    };

    match tag {
        "E" => {
            let event_id = next_int(&mut tokens, line_number, "event_id")?;
            let timestamp = next_int(&mut tokens, line_number, "timestamp")?;
            let kind = tokens
                .next()
                .ok_or_else(|| parse_error(line_number, "missing event type".into()))?;
            let payload = match kind {
                "NEWORDER" => {
                    let order_id = next_int(&mut tokens, line_number, "order_id")?;
                    let side = match tokens.next() {
                        Some("B") => Side::Buy,
                        Some("S") => Side::Sell,
                        _ => return Err(parse_error(line_number, "invalid side".into())),
                    };
                    let price: i64 = next_int(&mut tokens, line_number, "price")?;
                    let quantity = next_int(&mut tokens, line_number, "quantity")?;
                    let order_ts = next_int(&mut tokens, line_number, "order timestamp")?;
                    EventPayload::NewOrder(Order::new(order_id, side, price, quantity, order_ts))
                }
                "CANCEL" => {
                    let order_id = next_int(&mut tokens, line_number, "order_id")?;
                    EventPayload::Cancel { order_id }
                }
                "MODIFY" => {
                    let order_id = next_int(&mut tokens, line_number, "order_id")?;
                    let new_price: i64 = next_int(&mut tokens, line_number, "new_price")?;
                    let new_quantity = next_int(&mut tokens, line_number, "new_quantity")?;
                    EventPayload::Modify {
                        order_id,
                        new_price,
                        new_quantity,
                    }
                }
                other => {
                    return Err(parse_error(
                        line_number,
                        format!("unknown event type {other:?}"),
                    ));
                }
            };
            Ok(Some(LogRecord::Event(Event::new(
                event_id, timestamp, payload,
            ))))
        }
        "T" => {
            let trade_id = next_int(&mut tokens, line_number, "trade_id")?;
            let timestamp = next_int(&mut tokens, line_number, "timestamp")?;
            let maker_order_id = next_int(&mut tokens, line_number, "maker_id")?;
            let taker_order_id = next_int(&mut tokens, line_number, "taker_id")?;
            let price: i64 = next_int(&mut tokens, line_number, "price")?;
            let quantity = next_int(&mut tokens, line_number, "quantity")?;
            Ok(Some(LogRecord::Trade(Trade::new(
                trade_id,
                maker_order_id,
                taker_order_id,
                price,
                quantity,
                timestamp,
            ))))
        }
        other => Err(parse_error(
            line_number,
            format!("unknown record tag {other:?}"),
        )),
    }
}

fn next_int<'a, N: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_number: u64,
    field: &str,
) -> Result<N, ReplayError> {
    tokens
        .next()
        .ok_or_else(|| parse_error(line_number, format!("missing {field}")))?
        .parse()
        .map_err(|_| parse_error(line_number, format!("invalid {field}")))
}

fn parse_error(line_number: u64, message: String) -> ReplayError {
    ReplayError::Parse {
        line_number,
        message,
    }
}
