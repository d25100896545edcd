//! Config defaults: fills unset values.
//!
//! `channel.clientBuffer` is left unset; the channel falls back to its own
//! default queue depth.

use crate::schema::{BridgeConfig, ChannelConfig, IntentsConfig, LoggingConfig};

/// Channel name shared with the UI client.
pub const DEFAULT_CHANNEL_NAME: &str = "com.example.instagramCloneFlutter/commands";

/// Default round-trip bound (ms).
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 5_000;

pub const DEFAULT_AUTHORIZATION: &str = "authorized";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: BridgeConfig) -> BridgeConfig {
    let config = apply_channel_defaults(config);
    let config = apply_intent_defaults(config);
    apply_logging_defaults(config)
}

fn apply_channel_defaults(mut config: BridgeConfig) -> BridgeConfig {
    let channel = config.channel.get_or_insert_with(ChannelConfig::default);
    channel
        .name
        .get_or_insert_with(|| DEFAULT_CHANNEL_NAME.to_string());
    channel.call_timeout_ms.get_or_insert(DEFAULT_CALL_TIMEOUT_MS);
    config
}

fn apply_intent_defaults(mut config: BridgeConfig) -> BridgeConfig {
    let intents = config.intents.get_or_insert_with(IntentsConfig::default);
    intents
        .authorization
        .get_or_insert_with(|| DEFAULT_AUTHORIZATION.to_string());
    intents.donate.get_or_insert(true);
    config
}

fn apply_logging_defaults(mut config: BridgeConfig) -> BridgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
