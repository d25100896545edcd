pub mod detection;
pub mod dispatch;
pub mod donation;
pub mod extension;
pub mod handlers;
pub mod registry;
pub mod responder;
pub mod types;

pub use detection::detect_intent;
pub use dispatch::{DispatchState, IntentDispatcher};
pub use donation::{
    AuthorizationProvider, AuthorizationStatus, DonationReport, DonationSink, IntentDonor,
    StaticAuthorization, TracingDonationSink, request_and_donate,
};
pub use extension::IntentExtension;
pub use handlers::{IntentHandler, SwipeDownHandler, SwipeUpHandler};
pub use registry::{IntentRegistry, builtin_intents};
pub use responder::Responder;
pub use types::{Intent, IntentDef, IntentResponse, ResponseCode};
