/// Intent handlers.
///
/// Each intent has exactly one handler. A handler marshals onto the host
/// context, sends its fixed command over the channel, and collapses the
/// outcome into a success/failure `IntentResponse`.
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use swipebridge_channels::CommandChannel;
use swipebridge_core::{BridgeError, Command, CommandResult};
use swipebridge_logging::{BridgeEvent, EventLogger};

use crate::responder::Responder;
use crate::types::{Intent, IntentResponse};

#[async_trait]
pub trait IntentHandler: Send + Sync {
    /// The one intent this handler serves.
    fn intent(&self) -> Intent;

    fn command_name(&self) -> &'static str {
        self.intent().command_name()
    }

    /// Handle `intent` and answer through `responder` exactly once.
    async fn handle(&self, intent: Intent, responder: Responder);
}

// ---------------------------------------------------------------------------
// SwipeUp
// ---------------------------------------------------------------------------

pub struct SwipeUpHandler {
    channel: Arc<CommandChannel>,
}

impl SwipeUpHandler {
    pub fn new(channel: Arc<CommandChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl IntentHandler for SwipeUpHandler {
    fn intent(&self) -> Intent {
        Intent::SwipeUp
    }

    async fn handle(&self, intent: Intent, responder: Responder) {
        forward_to_channel(&self.channel, self.intent(), intent, responder).await;
    }
}

// ---------------------------------------------------------------------------
// SwipeDown
// ---------------------------------------------------------------------------

pub struct SwipeDownHandler {
    channel: Arc<CommandChannel>,
}

impl SwipeDownHandler {
    pub fn new(channel: Arc<CommandChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl IntentHandler for SwipeDownHandler {
    fn intent(&self) -> Intent {
        Intent::SwipeDown
    }

    async fn handle(&self, intent: Intent, responder: Responder) {
        forward_to_channel(&self.channel, self.intent(), intent, responder).await;
    }
}

// ---------------------------------------------------------------------------
// Shared forwarding path
// ---------------------------------------------------------------------------

async fn forward_to_channel(
    channel: &Arc<CommandChannel>,
    served: Intent,
    received: Intent,
    mut responder: Responder,
) {
    let dispatch_id = responder.dispatch_id();
    if served != received {
        warn!(%dispatch_id, %served, %received, "Handler received another intent; sending its own command");
    }

    let command = Command::new(served.command_name());
    responder.begin_channel_call();
    EventLogger::log_event(
        Some(dispatch_id),
        BridgeEvent::CommandSent {
            channel: channel.name().to_string(),
            command: command.name.clone(),
        },
    );

    let ch = channel.clone();
    let outcome = channel
        .host()
        .run(move || async move { ch.send(command).await })
        .await
        .and_then(|sent| sent);

    let (response, success, detail) = match outcome {
        Ok(CommandResult::Success(value)) => {
            let response = match value {
                Value::Null => IntentResponse::success(),
                value => IntentResponse::success().with_payload(value),
            };
            (response, true, None)
        }
        Ok(CommandResult::Failure(reason)) => {
            let err = BridgeError::ApplicationFailure(reason);
            (IntentResponse::failure(), false, Some(err.to_string()))
        }
        Err(err) => (IntentResponse::failure(), false, Some(err.to_string())),
    };

    EventLogger::log_event(
        Some(dispatch_id),
        BridgeEvent::CommandSettled {
            command: served.command_name().to_string(),
            success,
            detail,
        },
    );
    responder.respond(response);
}
