//! Command channels: a named request/response pipe from the host to the
//! cross-platform UI client.

pub mod client;
pub mod method_channel;
pub mod registry;

pub use client::{ClientEndpoint, MethodCall, MethodCallHandler, serve};
pub use method_channel::{CommandChannel, DEFAULT_CLIENT_BUFFER};
pub use registry::ChannelRegistry;
