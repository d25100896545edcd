/// Extension entry point — the surface the OS-level intent facility calls.
///
/// Identifiers outside the closed intent set are configuration defects and
/// come back as `UnhandledIntent`; the host treats that as fatal.
use std::sync::Arc;

use swipebridge_core::BridgeError;
use tracing::error;

use crate::dispatch::IntentDispatcher;
use crate::handlers::IntentHandler;
use crate::types::{Intent, IntentResponse};

pub struct IntentExtension {
    dispatcher: Arc<IntentDispatcher>,
}

impl IntentExtension {
    pub fn new(dispatcher: Arc<IntentDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Resolve the handler for an OS-level intent identifier.
    pub fn handler_for(&self, identifier: &str) -> Result<Arc<dyn IntentHandler>, BridgeError> {
        let intent = parse_identifier(identifier)?;
        Ok(self.dispatcher.resolve_handler(intent))
    }

    /// Resolve and dispatch in one step.
    pub async fn handle(&self, identifier: &str) -> Result<IntentResponse, BridgeError> {
        let intent = parse_identifier(identifier)?;
        Ok(self.dispatcher.dispatch(intent).await)
    }
}

fn parse_identifier(identifier: &str) -> Result<Intent, BridgeError> {
    identifier.parse::<Intent>().inspect_err(|e| {
        error!(%identifier, error = %e, "Intent outside the built-in set");
    })
}
