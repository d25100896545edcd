//! SwipeBridge configuration schema, typed for serde YAML/JSON.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Command channel settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelConfig>,

    /// Voice intent authorization and donation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<IntentsConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    /// Channel name; must match the client's verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Round-trip bound in milliseconds. `0` disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,

    /// Calls that may queue for the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_buffer: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentsConfig {
    /// notDetermined | denied | restricted | authorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donate: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling NDJSON logs. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

impl BridgeConfig {
    pub fn channel_name(&self) -> Option<&str> {
        self.channel.as_ref()?.name.as_deref()
    }

    /// Effective call timeout; `None` when disabled.
    pub fn call_timeout(&self) -> Option<std::time::Duration> {
        let ms = self.channel.as_ref()?.call_timeout_ms?;
        (ms > 0).then(|| std::time::Duration::from_millis(ms))
    }
}
