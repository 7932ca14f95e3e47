//! # Outbound Ports (Driven Ports / SPI)

use async_trait::async_trait;
use serde_json::Value;

/// A registered tool's implementation. Handler errors are captured by the
/// gateway and reported as an `error`-status result; they must not
/// propagate as panics.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, input: Value) -> Result<Value, String>;
}

/// Where the gateway auto-appends `TOOL_CALL`/`TOOL_RESULT` events when a
/// trace is attached to the current call. Implemented by the trace
/// subsystem; the gateway depends only on this trait.
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record_tool_call(&self, tool: &str, input_hash: &str);
    async fn record_tool_result(&self, tool: &str, output_hash: &str, status: &str, duration_ms: u64);
    async fn record_policy_violation(&self, tool: &str, reason: &str);
}
