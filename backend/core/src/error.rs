use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the SwipeBridge runtime.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No client is attached to the named channel (UI not initialized yet).
    #[error("command channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The client answered with an application-level error.
    #[error("application failure: {0}")]
    ApplicationFailure(String),

    /// An intent identifier outside the closed intent set. Fatal.
    #[error("unhandled intent: {0}")]
    UnhandledIntent(String),

    /// Best-effort intent donation failed. Logged, never propagated to callers.
    #[error("intent donation failed: {0}")]
    DonationFailure(String),

    #[error("command channel call timed out after {0:?}")]
    Timeout(Duration),

    #[error("called off the host execution context: {0}")]
    WrongContext(String),

    #[error("host execution context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
