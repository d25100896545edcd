//! Exactly-once response slot for one dispatch.
//!
//! `respond` consumes the responder, so it can fire at most once. If a
//! responder is dropped without responding, the drop guard reports
//! `failure()`, so the caller always hears back exactly once.

use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use swipebridge_logging::{BridgeEvent, EventLogger};

use crate::dispatch::DispatchState;
use crate::types::{Intent, IntentResponse};

type Callback = Box<dyn FnOnce(IntentResponse) + Send>;

pub struct Responder {
    dispatch_id: Uuid,
    intent: Intent,
    state: DispatchState,
    callback: Option<Callback>,
}

impl Responder {
    pub fn new(intent: Intent, callback: impl FnOnce(IntentResponse) + Send + 'static) -> Self {
        let dispatch_id = Uuid::new_v4();
        debug!(%dispatch_id, %intent, state = ?DispatchState::Received, "Dispatch state");
        Self {
            dispatch_id,
            intent,
            state: DispatchState::Received,
            callback: Some(Box::new(callback)),
        }
    }

    /// A responder whose response arrives on the returned receiver.
    pub fn channel(intent: Intent) -> (Self, oneshot::Receiver<IntentResponse>) {
        let (tx, rx) = oneshot::channel();
        let responder = Self::new(intent, move |response| {
            let _ = tx.send(response);
        });
        (responder, rx)
    }

    pub fn dispatch_id(&self) -> Uuid {
        self.dispatch_id
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Record that the handler is about to marshal onto the host context and
    /// call the channel.
    pub fn begin_channel_call(&mut self) {
        self.advance(DispatchState::AwaitingChannel);
    }

    pub fn respond(mut self, response: IntentResponse) {
        self.fire(response);
    }

    fn advance(&mut self, to: DispatchState) {
        if self.state.next() != Some(to) {
            warn!(
                dispatch_id = %self.dispatch_id,
                from = ?self.state,
                ?to,
                "Unexpected dispatch state transition"
            );
        }
        debug!(dispatch_id = %self.dispatch_id, intent = %self.intent, state = ?to, "Dispatch state");
        self.state = to;
    }

    fn fire(&mut self, response: IntentResponse) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        self.advance(DispatchState::Responded);
        EventLogger::log_event(
            Some(self.dispatch_id),
            BridgeEvent::IntentResponded {
                intent: self.intent.to_string(),
                code: response.code.as_str().to_string(),
            },
        );
        callback(response);
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if self.callback.is_some() {
            warn!(
                dispatch_id = %self.dispatch_id,
                intent = %self.intent,
                "Responder dropped without a response; reporting failure"
            );
            self.fire(IntentResponse::failure());
        }
    }
}

impl std::fmt::Debug for Responder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Responder")
            .field("dispatch_id", &self.dispatch_id)
            .field("intent", &self.intent)
            .field("state", &self.state)
            .field("responded", &self.callback.is_none())
            .finish()
    }
}
