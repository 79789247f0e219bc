//! Event ingestion: the event model, the dispatching ingestor, and the CSV
//! event source.

pub mod csv;
pub mod event;
pub mod ingestor;

pub use csv::{load_events_from_csv, parse_csv_line, CsvError};
pub use event::{Event, EventPayload};
pub use ingestor::EventIngestor;
