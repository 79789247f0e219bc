//! CSV event source.
//!
//! Two line shapes, discriminated by the first field:
//!
//! - New order: `<timestamp>,<order_id>,<BUY|SELL|B|S>,<price>,<quantity>`
//! - Action: `CANCEL,<order_id>` or `MODIFY,<order_id>,<new_price>,<new_quantity>`
//!
//! Fields are whitespace-trimmed. Lines beginning with `#` and empty lines
//! are skipped. When loading a file, malformed lines are reported with a
//! warning and dropped; they never abort the stream.
//!
//! Actions carry `timestamp = 0`: the book uses timestamps only for audit
//! and for re-queueing on a modify price change, so same-timestamp actions
//! stay unambiguously ordered by arrival. Producers needing distinct
//! timestamps must assign them upstream.

use super::event::{Event, EventPayload};
use crate::orderbook::{Order, Side};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Why a single CSV line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CsvError {
    /// The line does not have the field count its shape requires.
    FieldCount {
        /// Shape being parsed (`"order"`, `"CANCEL"`, `"MODIFY"`).
        shape: &'static str,
        /// Fields the shape requires.
        expected: usize,
        /// Fields found on the line.
        found: usize,
    },
    /// A numeric field failed to parse.
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw field text.
        value: String,
    },
    /// The side field is not one of `BUY`, `SELL`, `B`, `S`.
    UnknownSide(String),
    /// The first field names no known action and is not numeric.
    UnknownAction(String),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::FieldCount {
                shape,
                expected,
                found,
            } => {
                write!(f, "{shape} line needs {expected} fields, found {found}")
            }
            CsvError::InvalidNumber { field, value } => {
                write!(f, "invalid {field}: {value:?}")
            }
            CsvError::UnknownSide(side) => {
                write!(f, "unknown side {side:?} (must be BUY/B or SELL/S)")
            }
            CsvError::UnknownAction(action) => {
                write!(f, "unknown action {action:?}")
            }
        }
    }
}

impl std::error::Error for CsvError {}

fn fields_of(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, CsvError> {
    value.parse().map_err(|_| CsvError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_i64(field: &'static str, value: &str) -> Result<i64, CsvError> {
    value.parse().map_err(|_| CsvError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_side(value: &str) -> Result<Side, CsvError> {
    match value {
        "BUY" | "B" => Ok(Side::Buy),
        "SELL" | "S" => Ok(Side::Sell),
        other => Err(CsvError::UnknownSide(other.to_string())),
    }
}

/// Is the line blank or a `#` comment?
fn is_skippable(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Parse a 5-field new-order line into an event.
///
/// Returns `Ok(None)` for blank and comment lines. The event id is the
/// order id.
pub fn parse_csv_order(line: &str) -> Result<Option<Event>, CsvError> {
    if is_skippable(line) {
        return Ok(None);
    }
    let fields = fields_of(line);
    if fields.len() != 5 {
        return Err(CsvError::FieldCount {
            shape: "order",
            expected: 5,
            found: fields.len(),
        });
    }
    let timestamp = parse_u64("timestamp", fields[0])?;
    let order_id = parse_u64("order_id", fields[1])?;
    let side = parse_side(fields[2])?;
    let price = parse_i64("price", fields[3])?;
    let quantity = parse_u64("quantity", fields[4])?;

    let order = Order::new(order_id, side, price, quantity, timestamp);
    Ok(Some(Event::new(
        order_id,
        timestamp,
        EventPayload::NewOrder(order),
    )))
}

/// Parse a `CANCEL`/`MODIFY` action line into an event with `timestamp = 0`.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_csv_action(line: &str) -> Result<Option<Event>, CsvError> {
    if is_skippable(line) {
        return Ok(None);
    }
    let fields = fields_of(line);
    match fields[0] {
        "CANCEL" => {
            if fields.len() != 2 {
                return Err(CsvError::FieldCount {
                    shape: "CANCEL",
                    expected: 2,
                    found: fields.len(),
                });
            }
            let order_id = parse_u64("order_id", fields[1])?;
            Ok(Some(Event::new(
                order_id,
                0,
                EventPayload::Cancel { order_id },
            )))
        }
        "MODIFY" => {
            if fields.len() != 4 {
                return Err(CsvError::FieldCount {
                    shape: "MODIFY",
                    expected: 4,
                    found: fields.len(),
                });
            }
            let order_id = parse_u64("order_id", fields[1])?;
            let new_price = parse_i64("new_price", fields[2])?;
            let new_quantity = parse_u64("new_quantity", fields[3])?;
            Ok(Some(Event::new(
                order_id,
                0,
                EventPayload::Modify {
                    order_id,
                    new_price,
                    new_quantity,
                },
            )))
        }
        other => Err(CsvError::UnknownAction(other.to_string())),
    }
}

/// Parse a line of either shape, discriminating on the first field.
pub fn parse_csv_line(line: &str) -> Result<Option<Event>, CsvError> {
    if is_skippable(line) {
        return Ok(None);
    }
    let first = line.split(',').next().unwrap_or("").trim();
    match first {
        "CANCEL" | "MODIFY" => parse_csv_action(line),
        _ => parse_csv_order(line),
    }
}

/// Load all events from a CSV file.
///
/// Malformed lines are reported on the warning channel with their line
/// number and skipped; the returned stream contains every line that parsed.
pub fn load_events_from_csv(path: impl AsRef<Path>) -> io::Result<Vec<Event>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_csv_line(&line) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(err) => warn!("line {}: {}", idx + 1, err),
        }
    }
    Ok(events)
}
