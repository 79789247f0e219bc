//! # Deterministic Limit Order Book & Matching Engine
//!
//! An in-memory limit order book with a price-time priority matching
//! engine, driven by a serialized event stream and emitting a trade stream.
//! The same event sequence over an empty book always produces an identical
//! trade sequence, which makes the engine suitable as the core of an
//! exchange simulator, a market-data replayer, or a regression harness for
//! trading infrastructure.
//!
//! ## Key Pieces
//!
//! - **[`orderbook::OrderBook`]**: two price-indexed sides of FIFO price
//!   levels plus an O(1) order-id index, supporting insert, cancel, and
//!   filled-preserving modify.
//! - **[`orderbook::MatchingEngine`]**: sweeps the opposing side's best
//!   levels while the taker's limit crosses, producing maker-priced trades
//!   with monotonically increasing ids and partial fills at every step.
//! - **[`ingest::EventIngestor`]**: dispatches a typed event stream
//!   (new order / cancel / modify) into book mutations and trades, swallowing
//!   unknown-id operations so out-of-order or duplicated actions never
//!   abort a stream.
//! - **[`replay`]**: a textual event/trade log plus a runner that
//!   re-executes a log against a fresh engine and verifies the produced
//!   trades element-wise — the crate's audit and regression contract.
//! - **[`ingest::csv`]**: a forgiving CSV event source that warns on and
//!   drops malformed lines.
//! - **[`concurrent`]**: a mutex wrapper and a single-producer/
//!   single-consumer ring-buffer worker for callers that need to front the
//!   single-threaded core from other threads.
//!
//! ## Determinism Contract
//!
//! The core runs every operation to completion on the calling thread with
//! no suspension points and no background activity. Prices are signed
//! integers (never floating point) and timestamps are caller-supplied
//! logical values used only for tie-breaking and audit. After any ingested
//! event returns, the book is never left crossed, empty price levels never
//! linger, and the order index always agrees with the price maps.
//!
//! ## Example
//!
//! ```
//! use matchbook::{Event, EventIngestor, EventPayload, Order, Side};
//!
//! let mut ingestor = EventIngestor::new();
//!
//! // A resting sell, then a buy that crosses it.
//! let sell = Order::new(1, Side::Sell, 100, 5, 1);
//! let _ = ingestor.process(&Event::new(1, 1, EventPayload::NewOrder(sell)));
//! let buy = Order::new(2, Side::Buy, 100, 3, 2);
//! let trades = ingestor.process(&Event::new(2, 2, EventPayload::NewOrder(buy)));
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].maker_order_id, 1);
//! assert_eq!(trades[0].quantity, 3);
//!
//! // The maker keeps its unfilled remainder on the book.
//! let level = ingestor.book().find_level(Side::Sell, 100).unwrap();
//! assert_eq!(level.total_quantity(), 2);
//! ```

pub mod concurrent;
pub mod ingest;
pub mod metrics;
pub mod orderbook;
pub mod prelude;
pub mod replay;

pub use concurrent::{SharedEngine, SpscEngine, SpscRing};
pub use ingest::{load_events_from_csv, CsvError, Event, EventIngestor, EventPayload};
pub use metrics::Metrics;
pub use orderbook::{
    MatchingEngine, Order, OrderBook, OrderHandle, PriceLevel, Side, Trade, TradeListener,
};
pub use replay::{replay_file, EventLogger, LogRecord, ReplayError, ReplaySummary};
