/// Intent dispatch — resolve an intent to its handler and relay the response.
use std::sync::Arc;

use tracing::{info, warn};

use swipebridge_channels::CommandChannel;
use swipebridge_logging::{BridgeEvent, EventLogger};

use crate::handlers::{IntentHandler, SwipeDownHandler, SwipeUpHandler};
use crate::responder::Responder;
use crate::types::{Intent, IntentResponse};

// ---------------------------------------------------------------------------
// Per-dispatch state
// ---------------------------------------------------------------------------

/// `Received → AwaitingChannel → Responded`. `Responded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Received,
    AwaitingChannel,
    Responded,
}

impl DispatchState {
    /// The only legal successor, if any.
    pub fn next(self) -> Option<DispatchState> {
        match self {
            DispatchState::Received => Some(DispatchState::AwaitingChannel),
            DispatchState::AwaitingChannel => Some(DispatchState::Responded),
            DispatchState::Responded => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct IntentDispatcher {
    swipe_up: Arc<dyn IntentHandler>,
    swipe_down: Arc<dyn IntentHandler>,
}

impl IntentDispatcher {
    /// Build the fixed handler table over one command channel.
    pub fn new(channel: Arc<CommandChannel>) -> Self {
        Self {
            swipe_up: Arc::new(SwipeUpHandler::new(channel.clone())),
            swipe_down: Arc::new(SwipeDownHandler::new(channel)),
        }
    }

    pub fn resolve_handler(&self, intent: Intent) -> Arc<dyn IntentHandler> {
        match intent {
            Intent::SwipeUp => self.swipe_up.clone(),
            Intent::SwipeDown => self.swipe_down.clone(),
        }
    }

    /// Dispatch `intent`, answering through a caller-supplied responder.
    ///
    /// Once received, a dispatch runs to completion on its own task: dropping
    /// this future stops the wait, not the channel call, and the responder
    /// only fires after the call settles.
    pub async fn dispatch_with(&self, intent: Intent, responder: Responder) {
        let dispatch_id = responder.dispatch_id();
        info!(%dispatch_id, %intent, "[Intents] Dispatching");
        EventLogger::log_event(
            Some(dispatch_id),
            BridgeEvent::IntentReceived {
                intent: intent.to_string(),
            },
        );

        let handler = self.resolve_handler(intent);
        let task = tokio::spawn(async move { handler.handle(intent, responder).await });
        if let Err(e) = task.await {
            warn!(%dispatch_id, %intent, error = %e, "Dispatch task failed");
        }
    }

    /// Dispatch `intent` and wait for its response.
    pub async fn dispatch(&self, intent: Intent) -> IntentResponse {
        let (responder, response_rx) = Responder::channel(intent);
        self.dispatch_with(intent, responder).await;
        response_rx.await.unwrap_or_else(|_| IntentResponse::failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use swipebridge_channels::MethodCallHandler;
    use swipebridge_core::{Command, HostContext, MethodError};

    use crate::types::ResponseCode;

    /// Client that records what it receives and answers per command name.
    #[derive(Default)]
    struct RecordingClient {
        seen: Mutex<Vec<String>>,
        fail_down: bool,
    }

    #[async_trait]
    impl MethodCallHandler for RecordingClient {
        async fn on_method_call(&self, command: &Command) -> Result<Value, MethodError> {
            self.seen.lock().unwrap().push(command.name.clone());
            match command.name.as_str() {
                "swipeDown" if self.fail_down => {
                    Err(MethodError::new("at_top", "already at the first item"))
                }
                "swipeUp" | "swipeDown" => Ok(json!({ "index": 1 })),
                other => Err(MethodError::not_implemented(other)),
            }
        }
    }

    fn setup(timeout: Duration) -> (Arc<CommandChannel>, IntentDispatcher) {
        let host = HostContext::spawn("dispatch-test").unwrap();
        let channel = Arc::new(
            CommandChannel::new("com.example.instagramCloneFlutter/commands", host)
                .with_call_timeout(Some(timeout)),
        );
        let dispatcher = IntentDispatcher::new(channel.clone());
        (channel, dispatcher)
    }

    #[test]
    fn test_state_machine_is_linear() {
        assert_eq!(DispatchState::Received.next(), Some(DispatchState::AwaitingChannel));
        assert_eq!(DispatchState::AwaitingChannel.next(), Some(DispatchState::Responded));
        assert_eq!(DispatchState::Responded.next(), None);
    }

    #[tokio::test]
    async fn test_resolve_handler_uses_fixed_table() {
        let (_channel, dispatcher) = setup(Duration::from_secs(1));
        for intent in Intent::ALL {
            let handler = dispatcher.resolve_handler(intent);
            assert_eq!(handler.intent(), intent);
            assert_eq!(handler.command_name(), intent.command_name());
        }
        assert_ne!(
            dispatcher.resolve_handler(Intent::SwipeUp).command_name(),
            dispatcher.resolve_handler(Intent::SwipeDown).command_name()
        );
    }

    #[tokio::test]
    async fn test_swipe_up_success() {
        let (channel, dispatcher) = setup(Duration::from_secs(2));
        let client = Arc::new(RecordingClient::default());
        channel.set_client(client.clone());

        let response = dispatcher.dispatch(Intent::SwipeUp).await;
        assert_eq!(response.code, ResponseCode::Success);
        assert_eq!(response.payload, Some(json!({ "index": 1 })));
        assert_eq!(*client.seen.lock().unwrap(), vec!["swipeUp".to_string()]);
    }

    #[tokio::test]
    async fn test_swipe_down_application_error_is_failure() {
        let (channel, dispatcher) = setup(Duration::from_secs(2));
        let client = Arc::new(RecordingClient {
            fail_down: true,
            ..Default::default()
        });
        channel.set_client(client.clone());

        let response = dispatcher.dispatch(Intent::SwipeDown).await;
        assert_eq!(response, IntentResponse::failure());
        assert_eq!(*client.seen.lock().unwrap(), vec!["swipeDown".to_string()]);
    }

    #[tokio::test]
    async fn test_unavailable_channel_fails_without_hanging() {
        let (_channel, dispatcher) = setup(Duration::from_secs(30));
        let response = tokio::time::timeout(
            Duration::from_secs(1),
            dispatcher.dispatch(Intent::SwipeUp),
        )
        .await
        .expect("dispatch should settle promptly when no client is attached");
        assert_eq!(response, IntentResponse::failure());
    }

    #[tokio::test]
    async fn test_client_timeout_is_failure() {
        struct Silent;

        #[async_trait]
        impl MethodCallHandler for Silent {
            async fn on_method_call(&self, _command: &Command) -> Result<Value, MethodError> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Value::Null)
            }
        }

        let (channel, dispatcher) = setup(Duration::from_millis(50));
        channel.set_client(Arc::new(Silent));
        let response = dispatcher.dispatch(Intent::SwipeDown).await;
        assert_eq!(response, IntentResponse::failure());
    }

    #[tokio::test]
    async fn test_respond_fires_exactly_once_on_every_path() {
        let (channel, dispatcher) = setup(Duration::from_secs(2));

        async fn count_responses(dispatcher: &IntentDispatcher, intent: Intent) -> usize {
            let calls = Arc::new(AtomicUsize::new(0));
            let counter = calls.clone();
            let responder = Responder::new(intent, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            dispatcher.dispatch_with(intent, responder).await;
            calls.load(Ordering::SeqCst)
        }

        // Unavailable
        assert_eq!(count_responses(&dispatcher, Intent::SwipeUp).await, 1);

        // Success and application failure
        channel.set_client(Arc::new(RecordingClient {
            fail_down: true,
            ..Default::default()
        }));
        assert_eq!(count_responses(&dispatcher, Intent::SwipeUp).await, 1);
        assert_eq!(count_responses(&dispatcher, Intent::SwipeDown).await, 1);
    }

    #[tokio::test]
    async fn test_dropped_dispatch_still_waits_for_client() {
        struct SlowClient {
            done: Arc<AtomicBool>,
        }

        #[async_trait]
        impl MethodCallHandler for SlowClient {
            async fn on_method_call(&self, _command: &Command) -> Result<Value, MethodError> {
                tokio::time::sleep(Duration::from_millis(200)).await;
                self.done.store(true, Ordering::SeqCst);
                Ok(Value::Null)
            }
        }

        let (channel, dispatcher) = setup(Duration::from_secs(2));
        let done = Arc::new(AtomicBool::new(false));
        channel.set_client(Arc::new(SlowClient { done: done.clone() }));

        let responses = Arc::new(Mutex::new(Vec::new()));
        let seen = responses.clone();
        let client_done = done.clone();
        let responder = Responder::new(Intent::SwipeUp, move |response| {
            seen.lock()
                .unwrap()
                .push((response, client_done.load(Ordering::SeqCst)));
        });

        let waited = tokio::time::timeout(
            Duration::from_millis(50),
            dispatcher.dispatch_with(Intent::SwipeUp, responder),
        )
        .await;
        assert!(waited.is_err());
        assert!(responses.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let responses = responses.lock().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0], (IntentResponse::success(), true));
    }
}
