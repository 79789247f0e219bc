//! Prelude module that re-exports commonly used types.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Core book and matching types
pub use crate::orderbook::{
    MatchingEngine, Order, OrderBook, OrderHandle, PriceLevel, Side, Trade, TradeListener,
};

// Event model and ingestion
pub use crate::ingest::{load_events_from_csv, CsvError, Event, EventIngestor, EventPayload};

// Audit log and replay
pub use crate::replay::{
    replay_file, replay_reader, EventLogger, LogRecord, ReplayError, ReplaySummary,
};

// Counters
pub use crate::metrics::Metrics;

// Concurrency wrappers
pub use crate::concurrent::{SharedEngine, SpscEngine, SpscRing};
