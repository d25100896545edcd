//! Environment overrides for config values.
//!
//! | variable | field |
//! |---|---|
//! | `SWIPEBRIDGE_CHANNEL` | `channel.name` |
//! | `SWIPEBRIDGE_CALL_TIMEOUT_MS` | `channel.callTimeoutMs` |
//! | `SWIPEBRIDGE_LOG_LEVEL` | `logging.level` |
//! | `SWIPEBRIDGE_LOG_DIR` | `logging.dir` |

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::schema::{BridgeConfig, ChannelConfig, LoggingConfig};

pub const ENV_CHANNEL: &str = "SWIPEBRIDGE_CHANNEL";
pub const ENV_CALL_TIMEOUT_MS: &str = "SWIPEBRIDGE_CALL_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "SWIPEBRIDGE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SWIPEBRIDGE_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_process_env(config: BridgeConfig) -> BridgeConfig {
    apply_env_overrides(config, &std::env::vars().collect())
}

/// Apply overrides from the given map (useful for testing).
///
/// Empty values are ignored. An unparsable timeout is ignored with a warning.
pub fn apply_env_overrides(mut config: BridgeConfig, env: &HashMap<String, String>) -> BridgeConfig {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(name) = get(ENV_CHANNEL) {
        debug!(var = ENV_CHANNEL, "Overriding channel name from env");
        config
            .channel
            .get_or_insert_with(ChannelConfig::default)
            .name = Some(name.to_string());
    }

    if let Some(raw) = get(ENV_CALL_TIMEOUT_MS) {
        match raw.parse::<u64>() {
            Ok(ms) => {
                config
                    .channel
                    .get_or_insert_with(ChannelConfig::default)
                    .call_timeout_ms = Some(ms);
            }
            Err(e) => warn!(var = ENV_CALL_TIMEOUT_MS, value = %raw, error = %e, "Ignoring invalid timeout"),
        }
    }

    if let Some(level) = get(ENV_LOG_LEVEL) {
        config
            .logging
            .get_or_insert_with(LoggingConfig::default)
            .level = Some(level.to_string());
    }

    if let Some(dir) = get(ENV_LOG_DIR) {
        config
            .logging
            .get_or_insert_with(LoggingConfig::default)
            .dir = Some(dir.to_string());
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn overrides_channel_and_timeout() {
        let cfg = apply_env_overrides(
            BridgeConfig::default(),
            &env(&[(ENV_CHANNEL, "app/cmds"), (ENV_CALL_TIMEOUT_MS, "250")]),
        );
        assert_eq!(cfg.channel_name(), Some("app/cmds"));
        assert_eq!(cfg.call_timeout(), Some(std::time::Duration::from_millis(250)));
    }

    #[test]
    fn ignores_empty_and_invalid_values() {
        let cfg = apply_env_overrides(
            BridgeConfig::default(),
            &env(&[(ENV_CHANNEL, "  "), (ENV_CALL_TIMEOUT_MS, "soon")]),
        );
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn overrides_logging() {
        let cfg = apply_env_overrides(
            BridgeConfig::default(),
            &env(&[(ENV_LOG_LEVEL, "debug"), (ENV_LOG_DIR, "/tmp/sb-logs")]),
        );
        let logging = cfg.logging.unwrap();
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.dir.as_deref(), Some("/tmp/sb-logs"));
    }
}
