/// Intent types.
///
/// The intent set is closed: every variant maps to exactly one command name,
/// and that mapping lives in the exhaustive matches below.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use swipebridge_core::BridgeError;

// ---------------------------------------------------------------------------
// Intent
// ---------------------------------------------------------------------------

/// An externally triggered request to perform a named action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    SwipeUp,
    SwipeDown,
}

impl Intent {
    pub const ALL: [Intent; 2] = [Intent::SwipeUp, Intent::SwipeDown];

    /// Command name sent over the channel for this intent.
    pub fn command_name(self) -> &'static str {
        match self {
            Intent::SwipeUp => "swipeUp",
            Intent::SwipeDown => "swipeDown",
        }
    }

    /// Identifier the OS-level intent facility uses for this intent.
    pub fn identifier(self) -> &'static str {
        match self {
            Intent::SwipeUp => "SwipeUpIntent",
            Intent::SwipeDown => "SwipeDownIntent",
        }
    }

    /// Invocation phrase suggested at donation time. Not used for dispatch.
    pub fn suggested_phrase(self) -> &'static str {
        match self {
            Intent::SwipeUp => "Swipe up",
            Intent::SwipeDown => "Swipe down",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Intent::SwipeUp => "Advance to the next item in the feed",
            Intent::SwipeDown => "Go back to the previous item in the feed",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::SwipeUp => f.write_str("SwipeUp"),
            Intent::SwipeDown => f.write_str("SwipeDown"),
        }
    }
}

impl FromStr for Intent {
    type Err = BridgeError;

    /// Parse an OS-level identifier (`"SwipeUpIntent"`) or variant name (`"SwipeUp"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Intent::ALL
            .into_iter()
            .find(|intent| s == intent.identifier() || s == intent.to_string())
            .ok_or_else(|| BridgeError::UnhandledIntent(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// Static registration data for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentDef {
    pub intent: Intent,
    pub identifier: &'static str,
    pub command_name: &'static str,
    pub suggested_phrase: &'static str,
    pub description: &'static str,
}

impl From<Intent> for IntentDef {
    fn from(intent: Intent) -> Self {
        Self {
            intent,
            identifier: intent.identifier(),
            command_name: intent.command_name(),
            suggested_phrase: intent.suggested_phrase(),
            description: intent.description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseCode {
    Success,
    Failure,
}

impl ResponseCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseCode::Success => "success",
            ResponseCode::Failure => "failure",
        }
    }
}

/// Response handed back to the intent's originating caller.
///
/// Carries no error detail; channel and client errors are collapsed into
/// `Failure` before they get here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResponse {
    pub code: ResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl IntentResponse {
    pub fn success() -> Self {
        Self {
            code: ResponseCode::Success,
            payload: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            code: ResponseCode::Failure,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn is_success(&self) -> bool {
        self.code == ResponseCode::Success
    }
}
