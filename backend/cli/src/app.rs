//! Host application: startup wiring for the bridge.
//!
//! At launch the host starts its execution context, registers the command
//! channel under the configured name, builds the dispatcher and extension
//! entry point, and kicks off authorization + donation in the background.

use std::sync::Arc;

use anyhow::{Context, Result};
use swipebridge_channels::{ChannelRegistry, CommandChannel, MethodCallHandler};
use swipebridge_config::{BridgeConfig, DEFAULT_AUTHORIZATION};
use swipebridge_core::{BridgeError, HostContext};
use swipebridge_intents::{
    request_and_donate, AuthorizationStatus, DonationReport, DonationSink, IntentDispatcher,
    IntentDonor, IntentExtension, StaticAuthorization, TracingDonationSink,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Name of the host's main execution context thread.
const HOST_CONTEXT_NAME: &str = "swipebridge-main";

pub struct HostApp {
    registry: ChannelRegistry,
    channel: Arc<CommandChannel>,
    dispatcher: Arc<IntentDispatcher>,
    extension: IntentExtension,
    donation: Option<JoinHandle<DonationReport>>,
}

impl HostApp {
    pub fn launch(config: &BridgeConfig) -> Result<Self> {
        Self::launch_with(config, Arc::new(TracingDonationSink))
    }

    pub fn launch_with(config: &BridgeConfig, sink: Arc<dyn DonationSink>) -> Result<Self> {
        let name = config
            .channel_name()
            .ok_or_else(|| BridgeError::ConfigError("channel.name is not set".into()))?;
        let host = HostContext::spawn(HOST_CONTEXT_NAME)?;
        let mut channel = CommandChannel::new(name, host).with_call_timeout(config.call_timeout());
        if let Some(buffer) = config.channel.as_ref().and_then(|c| c.client_buffer) {
            channel = channel.with_client_buffer(buffer);
        }
        let registry = ChannelRegistry::new();
        let channel = registry.register(Arc::new(channel));
        let dispatcher = Arc::new(IntentDispatcher::new(channel.clone()));
        let extension = IntentExtension::new(dispatcher.clone());
        let donation = spawn_donation(config, sink)?;

        info!(
            channel = %channel.name(),
            timeout = ?channel.call_timeout(),
            "Host launched"
        );

        Ok(Self {
            registry,
            channel,
            dispatcher,
            extension,
            donation,
        })
    }

    /// Attach the UI client by the shared channel name.
    pub fn attach_client(&self, name: &str, handler: Arc<dyn MethodCallHandler>) -> Result<JoinHandle<()>> {
        Ok(self.registry.attach_client(name, handler)?)
    }

    pub fn channel(&self) -> &Arc<CommandChannel> {
        &self.channel
    }

    pub fn dispatcher(&self) -> &IntentDispatcher {
        &self.dispatcher
    }

    pub fn extension(&self) -> &IntentExtension {
        &self.extension
    }

    /// Wait for the background donation pass, if one was started.
    pub async fn finish_donation(&mut self) -> Option<DonationReport> {
        let handle = self.donation.take()?;
        match handle.await {
            Ok(report) => {
                info!(donated = report.donated.len(), failed = report.failed.len(), "Donation pass finished");
                Some(report)
            }
            Err(e) => {
                warn!(error = %e, "Donation task did not complete");
                None
            }
        }
    }
}

fn spawn_donation(
    config: &BridgeConfig,
    sink: Arc<dyn DonationSink>,
) -> Result<Option<JoinHandle<DonationReport>>> {
    let intents = config.intents.clone().unwrap_or_default();
    if intents.donate == Some(false) {
        info!("Intent donation disabled");
        return Ok(None);
    }

    let raw = intents
        .authorization
        .unwrap_or_else(|| DEFAULT_AUTHORIZATION.to_string());
    let status: AuthorizationStatus = serde_json::from_value(serde_json::Value::String(raw.clone()))
        .with_context(|| format!("invalid intents.authorization '{raw}'"))?;

    Ok(Some(tokio::spawn(async move {
        let donor = IntentDonor::new(sink);
        request_and_donate(&StaticAuthorization(status), &donor).await
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedClient;
    use swipebridge_config::{prepare, ChannelConfig, IntentsConfig, DEFAULT_CHANNEL_NAME};
    use swipebridge_intents::{Intent, IntentDef, ResponseCode};

    struct RejectingSink;

    #[async_trait::async_trait]
    impl DonationSink for RejectingSink {
        async fn donate(&self, def: &IntentDef) -> Result<(), BridgeError> {
            Err(BridgeError::DonationFailure(format!("{} refused", def.identifier)))
        }
    }

    fn config(authorization: &str) -> BridgeConfig {
        prepare(BridgeConfig {
            intents: Some(IntentsConfig {
                authorization: Some(authorization.into()),
                donate: Some(true),
            }),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_with_feed_client() {
        let mut app = HostApp::launch(&config("authorized")).unwrap();
        let name = app.channel().name().to_string();
        assert_eq!(name, "com.example.instagramCloneFlutter/commands");

        // Before the client attaches, every intent fails.
        assert_eq!(app.dispatcher().dispatch(Intent::SwipeUp).await.code, ResponseCode::Failure);

        app.attach_client(&name, Arc::new(FeedClient::new(3))).unwrap();
        assert!(app.channel().is_attached());

        let down = app.extension().handle("SwipeDownIntent").await.unwrap();
        assert_eq!(down.code, ResponseCode::Failure);
        let up = app.extension().handle("SwipeUpIntent").await.unwrap();
        assert_eq!(up.code, ResponseCode::Success);

        let report = app.finish_donation().await.unwrap();
        assert_eq!(report.donated, vec![Intent::SwipeUp, Intent::SwipeDown]);
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_fatal_error() {
        let app = HostApp::launch(&config("denied")).unwrap();
        let err = app.extension().handle("LikeIntent").await.unwrap_err();
        assert!(matches!(err, BridgeError::UnhandledIntent(_)));
    }

    #[tokio::test]
    async fn test_donation_failures_do_not_abort_launch() {
        let mut app = HostApp::launch_with(&config("authorized"), Arc::new(RejectingSink)).unwrap();
        let report = app.finish_donation().await.unwrap();
        assert!(report.donated.is_empty());
        assert_eq!(report.failed.len(), 2);
    }

    #[tokio::test]
    async fn test_unprepared_config_uses_default_authorization() {
        let config = BridgeConfig {
            channel: Some(ChannelConfig {
                name: Some(DEFAULT_CHANNEL_NAME.into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(config.intents.is_none());
        let mut app = HostApp::launch(&config).unwrap();
        let report = app.finish_donation().await.unwrap();
        assert_eq!(report.donated, vec![Intent::SwipeUp, Intent::SwipeDown]);
    }

    #[tokio::test]
    async fn test_client_must_use_registered_name() {
        let app = HostApp::launch(&config("denied")).unwrap();
        assert!(app
            .attach_client("com.example.instagramCloneFlutter/cmds", Arc::new(FeedClient::new(2)))
            .is_err());
        assert!(!app.channel().is_attached());
    }
}
