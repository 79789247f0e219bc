//! Error types for the replay subsystem.

use crate::orderbook::Trade;
use std::fmt;
use std::path::PathBuf;

/// Failure modes of log decoding and replay verification.
#[derive(Debug)]
#[non_exhaustive]
pub enum ReplayError {
    /// An I/O error occurred while opening or reading the log.
    Io {
        /// The underlying I/O error message.
        message: String,
        /// The file path involved, if known.
        path: Option<PathBuf>,
    },

    /// A log line could not be decoded.
    Parse {
        /// 1-based line number within the log.
        line_number: u64,
        /// Description of the decode failure.
        message: String,
    },

    /// Replay produced a different number of trades than the log records.
    CountMismatch {
        /// Trades recorded in the log.
        expected: usize,
        /// Trades produced by the replay.
        produced: usize,
    },

    /// A produced trade differs from the logged one at the same position
    /// under the (maker, taker, price, quantity) projection.
    Mismatch {
        /// 0-based position in the trade stream.
        index: usize,
        /// The logged trade.
        expected: Trade,
        /// The trade the replay produced.
        produced: Trade,
    },
}

impl ReplayError {
    /// Wrap an I/O error with the path it occurred on.
    pub(crate) fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ReplayError::Io {
            message: err.to_string(),
            path: Some(path.into()),
        }
    }

    /// Process exit code for the replay tool: 1 for a trade-stream
    /// mismatch, 2 for an unreadable or undecodable log.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            ReplayError::Io { .. } | ReplayError::Parse { .. } => 2,
            ReplayError::CountMismatch { .. } | ReplayError::Mismatch { .. } => 1,
        }
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io { message, path } => {
                if let Some(p) = path {
                    write!(f, "replay I/O error at {}: {message}", p.display())
                } else {
                    write!(f, "replay I/O error: {message}")
                }
            }
            ReplayError::Parse {
                line_number,
                message,
            } => {
                write!(f, "bad log line {line_number}: {message}")
            }
            ReplayError::CountMismatch { expected, produced } => {
                write!(
                    f,
                    "replay mismatch: expected {expected} trades but produced {produced}"
                )
            }
            ReplayError::Mismatch {
                index,
                expected,
                produced,
            } => {
                write!(
                    f,
                    "replay mismatch at trade {index}: expected maker {} taker {} price {} qty {}, \
                     produced maker {} taker {} price {} qty {}",
                    expected.maker_order_id,
                    expected.taker_order_id,
                    expected.price,
                    expected.quantity,
                    produced.maker_order_id,
                    produced.taker_order_id,
                    produced.price,
                    produced.quantity,
                )
            }
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<std::io::Error> for ReplayError {
    #[cold]
    fn from(err: std::io::Error) -> Self {
        ReplayError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}
