//! `swipebridge-config` — runtime configuration for the SwipeBridge host.
//!
//! Provides:
//! - Typed config schema (channel, intents, logging)
//! - YAML read/write
//! - Environment overrides
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, DEFAULT_AUTHORIZATION, DEFAULT_CHANNEL_NAME};
pub use env::{apply_env_overrides, apply_process_env};
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use schema::{BridgeConfig, ChannelConfig, IntentsConfig, LoggingConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load, apply env overrides, apply defaults, and validate a config file.
///
/// The validation report is returned unlogged so the caller can emit it once
/// its tracing subscriber is installed; pass it to [`check_report`].
pub async fn load_and_prepare(path: &Path) -> Result<(BridgeConfig, ValidationReport)> {
    let config = load_config(path).await?;
    let config = apply_process_env(config);
    Ok(prepare_with_report(config))
}

/// Defaults + validation, without logging or failing.
pub fn prepare_with_report(config: BridgeConfig) -> (BridgeConfig, ValidationReport) {
    let config = apply_all_defaults(config);
    let report = validate(&config);
    (config, report)
}

/// Log every warning and error in `report`, then fail on the first error.
pub fn check_report(report: &ValidationReport) -> Result<()> {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("invalid configuration ({} error(s)): {first}", report.errors.len());
    }
    Ok(())
}

/// Defaults + validation for an already-loaded config.
pub fn prepare(config: BridgeConfig) -> Result<BridgeConfig> {
    let (config, report) = prepare_with_report(config);
    check_report(&report)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn prepare_rejects_invalid_config() {
        let cfg = BridgeConfig {
            channel: Some(ChannelConfig {
                name: Some(" ".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = prepare(cfg).unwrap_err();
        assert!(err.to_string().contains("channel.name"));
    }

    #[test]
    fn prepare_fills_defaults() {
        let cfg = prepare(BridgeConfig::default()).unwrap();
        assert_eq!(cfg.channel_name(), Some(DEFAULT_CHANNEL_NAME));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn report_is_logged_through_installed_subscriber() {
        let cfg = BridgeConfig {
            channel: Some(ChannelConfig {
                call_timeout_ms: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (cfg, report) = prepare_with_report(cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(cfg.call_timeout(), None);

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || check_report(&report)).unwrap();

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Config warning"));
        assert!(output.contains("channel.callTimeoutMs"));
    }

    #[test]
    fn check_report_fails_on_error() {
        let (_, report) = prepare_with_report(BridgeConfig {
            channel: Some(ChannelConfig {
                client_buffer: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(!report.is_valid());
        assert!(check_report(&report).is_err());
    }
}
