//! Client side of a command channel.
//!
//! The client is the UI runtime. It receives `MethodCall`s in order and
//! answers each one through its reply slot.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use swipebridge_core::{Command, MethodError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

/// Client-provided handler for commands arriving on a channel.
#[async_trait]
pub trait MethodCallHandler: Send + Sync {
    /// Handle one command and return its success payload or an error object.
    ///
    /// Unknown commands should answer with [`MethodError::not_implemented`].
    async fn on_method_call(&self, command: &Command) -> Result<Value, MethodError>;
}

/// One in-flight call delivered to the client.
#[derive(Debug)]
pub struct MethodCall {
    pub id: Uuid,
    pub command: Command,
    reply: oneshot::Sender<Result<Value, MethodError>>,
}

impl MethodCall {
    pub(crate) fn new(command: Command) -> (Self, oneshot::Receiver<Result<Value, MethodError>>) {
        let (reply, rx) = oneshot::channel();
        let call = Self {
            id: Uuid::new_v4(),
            command,
            reply,
        };
        (call, rx)
    }

    /// Answer the call. Consumes it, so a call is answered at most once.
    pub fn reply(self, result: Result<Value, MethodError>) {
        if self.reply.send(result).is_err() {
            debug!(call_id = %self.id, "Caller stopped waiting before reply");
        }
    }
}

/// Receiving end handed to an attached client.
pub struct ClientEndpoint {
    channel_name: String,
    rx: mpsc::Receiver<MethodCall>,
}

impl ClientEndpoint {
    pub(crate) fn new(channel_name: String, rx: mpsc::Receiver<MethodCall>) -> Self {
        Self { channel_name, rx }
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    /// Next call from the host, or `None` once the client has been detached.
    pub async fn next_call(&mut self) -> Option<MethodCall> {
        self.rx.recv().await
    }
}

/// Serve calls from `endpoint` one at a time until the client is detached.
pub async fn serve(mut endpoint: ClientEndpoint, handler: Arc<dyn MethodCallHandler>) {
    debug!(channel = %endpoint.channel_name, "Client serve loop started");
    while let Some(call) = endpoint.next_call().await {
        let result = handler.on_method_call(&call.command).await;
        if let Err(e) = &result {
            warn!(
                channel = %endpoint.channel_name,
                command = %call.command.name,
                error = %e,
                "Client reported an application error"
            );
        }
        call.reply(result);
    }
    debug!(channel = %endpoint.channel_name, "Client serve loop finished");
}
