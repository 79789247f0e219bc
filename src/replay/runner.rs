//! Replay: re-execute a logged event stream and verify its trade stream.
//!
//! The runner feeds every `E` line through a fresh book, engine, and
//! ingestor, collects the produced trades, and compares them element-wise
//! against the `T` lines under the (maker, taker, price, quantity)
//! projection. Timestamps and trade ids are not asserted; trade-id
//! monotonicity is an engine guarantee, not a replay criterion.

use super::codec::{self, LogRecord};
use super::error::ReplayError;
use crate::ingest::EventIngestor;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Outcome of a successful replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Events re-applied from the log.
    pub events_replayed: u64,
    /// Trades produced and verified against the log.
    pub trades_verified: u64,
}

/// Replay the log at `path` and verify its trades.
///
/// # Errors
///
/// [`ReplayError::Io`]/[`ReplayError::Parse`] when the log cannot be read
/// or decoded, [`ReplayError::CountMismatch`]/[`ReplayError::Mismatch`]
/// when the produced trade stream differs from the logged one.
pub fn replay_file(path: impl AsRef<Path>) -> Result<ReplaySummary, ReplayError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReplayError::io(e, path))?;
    replay_reader(BufReader::new(file))
}

/// Replay a log from any buffered reader. See [`replay_file`].
pub fn replay_reader(reader: impl BufRead) -> Result<ReplaySummary, ReplayError> {
    let mut ingestor = EventIngestor::new();
    let mut expected = Vec::new();
    let mut produced = Vec::new();
    let mut events_replayed = 0u64;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match codec::parse_record(&line, idx as u64 + 1)? {
            Some(LogRecord::Event(event)) => {
                produced.extend(ingestor.process(&event));
                events_replayed += 1;
            }
            Some(LogRecord::Trade(trade)) => expected.push(trade),
            None => {}
        }
    }

    if expected.len() != produced.len() {
        return Err(ReplayError::CountMismatch {
            expected: expected.len(),
            produced: produced.len(),
        });
    }
    for (index, (want, got)) in expected.iter().zip(&produced).enumerate() {
        if !want.matches(got) {
            return Err(ReplayError::Mismatch {
                index,
                expected: *want,
                produced: *got,
            });
        }
    }

    Ok(ReplaySummary {
        events_replayed,
        trades_verified: produced.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_replay_matching_log() {
        let log = "\
E 1 1 NEWORDER 1 S 100 5 1
E 2 2 NEWORDER 2 B 100 3 2
T 1 2 1 2 100 3
";
        let summary = replay_reader(Cursor::new(log)).unwrap();
        assert_eq!(summary.events_replayed, 2);
        assert_eq!(summary.trades_verified, 1);
    }

    #[test]
    fn test_replay_empty_log() {
        let summary = replay_reader(Cursor::new("")).unwrap();
        assert_eq!(summary.events_replayed, 0);
        assert_eq!(summary.trades_verified, 0);
    }

    #[test]
    fn test_replay_detects_count_mismatch() {
        // The log claims a trade that the events cannot produce.
        let log = "\
E 1 1 NEWORDER 1 S 100 5 1
T 1 1 1 2 100 3
";
        match replay_reader(Cursor::new(log)) {
            Err(ReplayError::CountMismatch { expected, produced }) => {
                assert_eq!(expected, 1);
                assert_eq!(produced, 0);
            }
            other => panic!("expected count mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_detects_trade_mismatch() {
        // Logged quantity differs from what the events produce.
        let log = "\
E 1 1 NEWORDER 1 S 100 5 1
E 2 2 NEWORDER 2 B 100 3 2
T 1 2 1 2 100 4
";
        match replay_reader(Cursor::new(log)) {
            Err(ReplayError::Mismatch { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected trade mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_ignores_trade_id_and_timestamp_differences() {
        // T line carries an arbitrary trade id and timestamp; only the
        // fill projection must agree.
        let log = "\
E 1 1 NEWORDER 1 S 100 5 1
E 2 2 NEWORDER 2 B 100 3 2
T 999 12345 1 2 100 3
";
        assert!(replay_reader(Cursor::new(log)).is_ok());
    }
}
