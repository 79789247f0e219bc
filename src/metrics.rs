//! Ingestion counters.

use serde::Serialize;
use std::fmt;

/// Running totals maintained by the ingestor.
///
/// Counters track attempts, not outcomes: a cancel for an unknown id still
/// counts as a cancel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// New-order events processed.
    pub orders_ingested: u64,
    /// Trades produced by matching.
    pub trades_executed: u64,
    /// Cancel events processed.
    pub cancels: u64,
    /// Modify events processed.
    pub modifies: u64,
}

impl Metrics {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "orders={} trades={} cancels={} modifies={}",
            self.orders_ingested, self.trades_executed, self.cancels, self.modifies
        )
    }
}
