//! Append-only event/trade log writer.
//!
//! Produces the line format decoded by [`super::codec`]. Each record is
//! flushed as it is written so the log stays usable for replay even if the
//! process dies mid-session.

use super::codec;
use crate::ingest::event::Event;
use crate::orderbook::Trade;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes events and trades to a text log, one record per line.
#[derive(Debug)]
pub struct EventLogger {
    out: BufWriter<File>,
}

impl EventLogger {
    /// Create (or truncate) the log at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    /// Append one event. Events with an empty payload write nothing.
    pub fn log_event(&mut self, event: &Event) -> io::Result<()> {
        if let Some(line) = codec::encode_event(event) {
            writeln!(self.out, "{line}")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Append one trade.
    pub fn log_trade(&mut self, trade: &Trade) -> io::Result<()> {
        writeln!(self.out, "{}", codec::encode_trade(trade))?;
        self.out.flush()
    }

    /// Flush buffered output to the file.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
