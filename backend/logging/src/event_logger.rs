//! Bridge Event Logger
//!
//! Structured events for each dispatch, emitted through `tracing` on the
//! `bridge_events` target so file output carries them as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    IntentReceived {
        intent: String,
    },
    CommandSent {
        channel: String,
        command: String,
    },
    CommandSettled {
        command: String,
        success: bool,
        detail: Option<String>,
    },
    IntentResponded {
        intent: String,
        code: String,
    },
    DonationSucceeded {
        intent: String,
    },
    DonationFailed {
        intent: String,
        error: String,
    },
}

impl BridgeEvent {
    fn is_failure(&self) -> bool {
        matches!(
            self,
            BridgeEvent::DonationFailed { .. } | BridgeEvent::CommandSettled { success: false, .. }
        )
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub dispatch_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub event: BridgeEvent,
}

impl EventLogEntry {
    pub fn new(dispatch_id: Option<Uuid>, event: BridgeEvent) -> Self {
        Self {
            dispatch_id,
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Log a bridge event. `dispatch_id` ties together the events of one dispatch.
    pub fn log_event(dispatch_id: Option<Uuid>, event: BridgeEvent) {
        let entry = EventLogEntry::new(dispatch_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_else(|_| format!("{entry:?}"));

        if entry.event.is_failure() {
            warn!(target: "bridge_events", event = %payload, "Bridge event");
        } else {
            info!(target: "bridge_events", event = %payload, "Bridge event");
        }
    }
}
