//! Concurrency wrappers over the single-threaded core.
//!
//! The core book, engine, and ingestor are strictly single-threaded; these
//! wrappers only serialize access and guarantee nothing beyond FIFO
//! delivery. Neither provides exactly-once or recovery semantics.

pub mod spsc;

pub use spsc::{SpscEngine, SpscRing};

use crate::ingest::{Event, EventIngestor};
use crate::orderbook::{OrderBook, Trade};
use std::sync::{Mutex, PoisonError};

/// Mutex-fronted engine: at most one concurrent ingest.
///
/// Each [`process_event`](SharedEngine::process_event) call holds the lock
/// for its full duration. Multi-threaded callers get a trade sequence that
/// is a function of the arrival interleaving they produced; callers wanting
/// determinism must serialize submissions themselves.
#[derive(Debug, Default)]
pub struct SharedEngine {
    inner: Mutex<EventIngestor>,
}

impl SharedEngine {
    /// Create a shared engine over an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event under the lock and return its trades.
    pub fn process_event(&self, event: &Event) -> Vec<Trade> {
        self.lock().process(event)
    }

    /// Run a read-only query against the book under the lock.
    pub fn with_book<R>(&self, f: impl FnOnce(&OrderBook) -> R) -> R {
        f(self.lock().book())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EventIngestor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
