//! Config validation with field paths in every message.

use crate::schema::BridgeConfig;
use thiserror::Error;

const AUTHORIZATION_VALUES: [&str; 4] = ["notDetermined", "denied", "restricted", "authorized"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BridgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_channel(config, &mut report);
    validate_intents(config, &mut report);
    report
}

fn validate_channel(config: &BridgeConfig, report: &mut ValidationReport) {
    let Some(channel) = &config.channel else { return };

    if let Some(name) = &channel.name {
        if name.trim().is_empty() {
            report.error("channel.name", "Channel name cannot be empty");
        } else if name.trim() != name {
            report.error(
                "channel.name",
                "Channel name has surrounding whitespace; it must match the client verbatim",
            );
        }
    }

    if channel.call_timeout_ms == Some(0) {
        report.warn(
            "channel.callTimeoutMs",
            "Timeout disabled; an unresponsive client will stall intent responses",
        );
    }

    if channel.client_buffer == Some(0) {
        report.error("channel.clientBuffer", "Client buffer must be at least 1");
    }
}

fn validate_intents(config: &BridgeConfig, report: &mut ValidationReport) {
    let Some(intents) = &config.intents else { return };
    if let Some(status) = &intents.authorization {
        if !AUTHORIZATION_VALUES.contains(&status.as_str()) {
            report.error(
                "intents.authorization",
                format!(
                    "Unknown authorization status '{status}'. Valid: {}",
                    AUTHORIZATION_VALUES.join(", ")
                ),
            );
        }
    }
}
