//! Audit log and replay: the textual event/trade codec, the log writer,
//! and the runner that re-executes a log and verifies its trades.

pub mod codec;
pub mod error;
pub mod logger;
pub mod runner;

pub use codec::{encode_event, encode_trade, parse_record, LogRecord};
pub use error::ReplayError;
pub use logger::EventLogger;
pub use runner::{replay_file, replay_reader, ReplaySummary};
