//! Voice authorization and best-effort intent donation.
//!
//! Donation only runs once authorization comes back `Authorized`, and only
//! once per donor. Failures are logged and swallowed; nothing here returns
//! an error to the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use swipebridge_core::BridgeError;
use swipebridge_logging::{BridgeEvent, EventLogger};
use tracing::{debug, info};

use crate::registry::IntentRegistry;
use crate::types::{Intent, IntentDef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationStatus {
    #[default]
    NotDetermined,
    Denied,
    Restricted,
    Authorized,
}

/// Source of the voice/intent authorization decision.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    async fn request_authorization(&self) -> AuthorizationStatus;
}

/// Destination for donated intents.
#[async_trait]
pub trait DonationSink: Send + Sync {
    async fn donate(&self, def: &IntentDef) -> Result<(), BridgeError>;
}

/// Provider that always answers with a fixed status (from config).
pub struct StaticAuthorization(pub AuthorizationStatus);

#[async_trait]
impl AuthorizationProvider for StaticAuthorization {
    async fn request_authorization(&self) -> AuthorizationStatus {
        self.0
    }
}

/// Sink that records donations in the log only.
pub struct TracingDonationSink;

#[async_trait]
impl DonationSink for TracingDonationSink {
    async fn donate(&self, def: &IntentDef) -> Result<(), BridgeError> {
        info!(
            intent = %def.intent,
            phrase = %def.suggested_phrase,
            "Donated intent"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonationReport {
    pub donated: Vec<Intent>,
    pub failed: Vec<Intent>,
}

pub struct IntentDonor {
    registry: IntentRegistry,
    sink: Arc<dyn DonationSink>,
    donated: AtomicBool,
}

impl IntentDonor {
    pub fn new(sink: Arc<dyn DonationSink>) -> Self {
        Self {
            registry: IntentRegistry::new(),
            sink,
            donated: AtomicBool::new(false),
        }
    }

    pub fn has_donated(&self) -> bool {
        self.donated.load(Ordering::SeqCst)
    }

    /// Authorization callback. Donates every intent once, and only when authorized.
    pub async fn on_authorization(&self, status: AuthorizationStatus) -> DonationReport {
        let mut report = DonationReport::default();
        if status != AuthorizationStatus::Authorized {
            info!(?status, "Intent authorization not granted; skipping donation");
            return report;
        }
        if self.donated.swap(true, Ordering::SeqCst) {
            debug!("Intents already donated");
            return report;
        }

        for def in self.registry.all() {
            match self.sink.donate(def).await {
                Ok(()) => {
                    EventLogger::log_event(
                        None,
                        BridgeEvent::DonationSucceeded {
                            intent: def.intent.to_string(),
                        },
                    );
                    report.donated.push(def.intent);
                }
                Err(e) => {
                    EventLogger::log_event(
                        None,
                        BridgeEvent::DonationFailed {
                            intent: def.intent.to_string(),
                            error: e.to_string(),
                        },
                    );
                    report.failed.push(def.intent);
                }
            }
        }
        report
    }
}

/// Request authorization and donate if granted.
pub async fn request_and_donate(
    provider: &dyn AuthorizationProvider,
    donor: &IntentDonor,
) -> DonationReport {
    let status = provider.request_authorization().await;
    info!(?status, "Intent authorization resolved");
    donor.on_authorization(status).await
}
