/// Channel registry — the host's binary messenger.
///
/// Host and client agree on channel names out of band; the client attaches by
/// name and fails if the host never registered that name.
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use swipebridge_core::BridgeError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::MethodCallHandler;
use crate::method_channel::CommandChannel;

#[derive(Default)]
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Arc<CommandChannel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel under its own name, replacing any previous one.
    pub fn register(&self, channel: Arc<CommandChannel>) -> Arc<CommandChannel> {
        let name = channel.name().to_string();
        let mut channels = self.channels.write().unwrap_or_else(|e| e.into_inner());
        if channels.insert(name.clone(), channel.clone()).is_some() {
            warn!(channel = %name, "Replaced previously registered channel");
        } else {
            info!(channel = %name, context = %channel.host().name(), "Registered command channel");
        }
        channel
    }

    pub fn get(&self, name: &str) -> Option<Arc<CommandChannel>> {
        self.channels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Attach a client to the channel registered under `name`.
    pub fn attach_client(
        &self,
        name: &str,
        handler: Arc<dyn MethodCallHandler>,
    ) -> Result<JoinHandle<()>, BridgeError> {
        let channel = self.get(name).ok_or_else(|| {
            BridgeError::ChannelUnavailable(format!("no channel registered as {name}"))
        })?;
        Ok(channel.set_client(handler))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use swipebridge_core::{Command, HostContext, MethodError};

    struct Noop;

    #[async_trait]
    impl MethodCallHandler for Noop {
        async fn on_method_call(&self, _command: &Command) -> Result<Value, MethodError> {
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_attach_requires_exact_name() {
        let host = HostContext::spawn("registry-test").unwrap();
        let registry = ChannelRegistry::new();
        let channel = registry.register(Arc::new(CommandChannel::new("app/commands", host)));

        let err = registry.attach_client("app/Commands", Arc::new(Noop)).unwrap_err();
        assert!(matches!(err, BridgeError::ChannelUnavailable(_)));
        assert!(!channel.is_attached());

        registry.attach_client("app/commands", Arc::new(Noop)).unwrap();
        assert!(channel.is_attached());
        assert_eq!(registry.names(), vec!["app/commands".to_string()]);
    }
}
