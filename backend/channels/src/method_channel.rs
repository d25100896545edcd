use std::sync::{Arc, RwLock};
use std::time::Duration;

use swipebridge_core::{BridgeError, Command, CommandResult, HostContext};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::{ClientEndpoint, MethodCall, MethodCallHandler, serve};

/// Default number of calls that may queue for the client.
pub const DEFAULT_CLIENT_BUFFER: usize = 16;

/// Default bound on a single round trip.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// A named command channel bound to the host execution context.
///
/// Created once at startup and shared by `Arc`. The only mutable state is the
/// client attachment, which is swapped by `attach`/`detach` and read by `send`.
pub struct CommandChannel {
    name: String,
    host: HostContext,
    call_timeout: Option<Duration>,
    client_buffer: usize,
    client: RwLock<Option<mpsc::Sender<MethodCall>>>,
}

impl CommandChannel {
    pub fn new(name: impl Into<String>, host: HostContext) -> Self {
        Self {
            name: name.into(),
            host,
            call_timeout: Some(DEFAULT_CALL_TIMEOUT),
            client_buffer: DEFAULT_CLIENT_BUFFER,
            client: RwLock::new(None),
        }
    }

    /// Bound every round trip by `timeout`. `None` waits indefinitely.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_client_buffer(mut self, buffer: usize) -> Self {
        self.client_buffer = buffer.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    pub fn is_attached(&self) -> bool {
        self.current_client().is_some()
    }

    /// Attach a client, replacing any previous one.
    ///
    /// The previous client's endpoint drains and then yields `None`.
    pub fn attach(&self) -> ClientEndpoint {
        let (tx, rx) = mpsc::channel(self.client_buffer);
        let mut slot = self.client.write().unwrap_or_else(|e| e.into_inner());
        if slot.replace(tx).is_some() {
            info!(channel = %self.name, "Replaced attached client");
        } else {
            info!(channel = %self.name, "Client attached");
        }
        ClientEndpoint::new(self.name.clone(), rx)
    }

    /// Attach `handler` as the client and serve its calls on a background task.
    pub fn set_client(&self, handler: Arc<dyn MethodCallHandler>) -> JoinHandle<()> {
        let endpoint = self.attach();
        tokio::spawn(serve(endpoint, handler))
    }

    /// Detach the current client. Returns whether one was attached.
    pub fn detach(&self) -> bool {
        let mut slot = self.client.write().unwrap_or_else(|e| e.into_inner());
        let was_attached = slot.take().is_some();
        if was_attached {
            info!(channel = %self.name, "Client detached");
        }
        was_attached
    }

    /// Send one command to the client and wait for its result.
    ///
    /// Must be called on the host context. Client application errors come
    /// back as `Ok(CommandResult::Failure(..))`; only channel faults are `Err`.
    pub async fn send(&self, command: Command) -> Result<CommandResult, BridgeError> {
        if !self.host.is_current() {
            return Err(BridgeError::WrongContext(format!(
                "`{}` sent on channel {} outside context {}",
                command.name,
                self.name,
                self.host.name()
            )));
        }

        let Some(client) = self.current_client() else {
            debug!(channel = %self.name, command = %command.name, "No client attached");
            return Err(BridgeError::ChannelUnavailable(format!(
                "no client attached to {}",
                self.name
            )));
        };

        let command_name = command.name.clone();
        let (call, reply_rx) = MethodCall::new(command);
        let call_id = call.id;
        debug!(channel = %self.name, command = %command_name, %call_id, "Sending command");

        let round_trip = async {
            client.send(call).await.map_err(|_| {
                BridgeError::ChannelUnavailable(format!("client on {} went away", self.name))
            })?;
            reply_rx.await.map_err(|_| {
                BridgeError::ChannelUnavailable(format!(
                    "client on {} dropped `{}` without replying",
                    self.name, command_name
                ))
            })
        };

        let reply = match self.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, round_trip).await {
                Ok(reply) => reply?,
                Err(_) => {
                    warn!(channel = %self.name, command = %command_name, %call_id, ?limit, "Command timed out");
                    return Err(BridgeError::Timeout(limit));
                }
            },
            None => round_trip.await?,
        };

        let result = CommandResult::from(reply);
        debug!(
            channel = %self.name,
            command = %command_name,
            %call_id,
            success = result.is_success(),
            "Command settled"
        );
        Ok(result)
    }

    fn current_client(&self) -> Option<mpsc::Sender<MethodCall>> {
        self.client
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .filter(|tx| !tx.is_closed())
            .cloned()
    }
}

impl std::fmt::Debug for CommandChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandChannel")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("call_timeout", &self.call_timeout)
            .field("attached", &self.is_attached())
            .finish()
    }
}
