//! Structured logging for SwipeBridge.
//!
//! Console + rolling NDJSON file output, and structured bridge events for the
//! intent → command → response path.

pub mod event_logger;
pub mod logger;

pub use event_logger::{BridgeEvent, EventLogEntry, EventLogger};
pub use logger::init_logger;
