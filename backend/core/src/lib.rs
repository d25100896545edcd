pub mod context;
pub mod error;
pub mod message;

pub use context::HostContext;
pub use error::BridgeError;
pub use message::{Command, CommandResult, MethodError};
