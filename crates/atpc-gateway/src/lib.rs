//! # Tool Gateway Subsystem (C6)
//!
//! Registers tool handlers and routes every invocation through policy
//! evaluation, deterministic input/output hashing, and (when attached)
//! execution-trace auto-wiring.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{CallLogEntry, CallStatus, ToolCallRequest, ToolCallResult};
pub use domain::errors::GatewayError;
pub use domain::hashing::hash_canonical;
pub use domain::tool_name::parse_tool_name;
pub use ports::inbound::ToolGatewayApi;
pub use ports::outbound::{ToolHandler, TraceSink};
pub use service::ToolGateway;
