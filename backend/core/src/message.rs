use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Method error code a client uses for a command it does not know.
pub const NOT_IMPLEMENTED: &str = "not_implemented";

/// A command sent from the host to the client over a command channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
}

impl Command {
    /// A command with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Application-level error reported by the client for one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodError {
    pub code: String,
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl MethodError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn not_implemented(command: &str) -> Self {
        Self::new(NOT_IMPLEMENTED, format!("no handler for command `{command}`"))
    }

    /// Human-readable description carried into `CommandResult::Failure`.
    pub fn description(&self) -> String {
        match &self.message {
            Some(message) => format!("{}: {}", self.code, message),
            None => self.code.clone(),
        }
    }
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

/// Outcome of a single command round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CommandResult {
    Success(Value),
    Failure(String),
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }

    /// Convert into a `Result`, surfacing client failures as `ApplicationFailure`.
    pub fn into_result(self) -> Result<Value, BridgeError> {
        match self {
            CommandResult::Success(value) => Ok(value),
            CommandResult::Failure(reason) => Err(BridgeError::ApplicationFailure(reason)),
        }
    }
}

impl From<Result<Value, MethodError>> for CommandResult {
    fn from(reply: Result<Value, MethodError>) -> Self {
        match reply {
            Ok(value) => CommandResult::Success(value),
            Err(err) => CommandResult::Failure(err.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_error_becomes_failure_description() {
        let reply: Result<Value, MethodError> = Err(MethodError::new("end_of_feed", "no more items"));
        let result = CommandResult::from(reply);
        assert_eq!(result, CommandResult::Failure("end_of_feed: no more items".into()));
        assert!(!result.is_success());
    }

    #[test]
    fn test_failure_into_application_failure() {
        let err = CommandResult::Failure("boom".into()).into_result().unwrap_err();
        assert!(matches!(err, BridgeError::ApplicationFailure(ref r) if r == "boom"));
    }

    #[test]
    fn test_command_wire_shape() {
        let json = serde_json::to_value(Command::new("swipeUp")).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "swipeUp" }));
    }
}
