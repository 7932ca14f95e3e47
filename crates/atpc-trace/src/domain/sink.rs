//! # Gateway Trace Sink Adapter
//!
//! Wraps a [`Trace`] so it can be handed to `atpc-gateway`'s `ToolGateway`
//! as its [`atpc_gateway::TraceSink`] outbound port, auto-recording
//! `TOOL_CALL`/`TOOL_RESULT` events for every tool invocation that passes
//! through the gateway.

use std::sync::Arc;

use async_trait::async_trait;
use atpc_gateway::TraceSink;
use atpc_identity::AgentIdentity;
use parking_lot::Mutex;
use serde_json::json;

use super::entities::{EVENT_POLICY_VIOLATION, EVENT_TOOL_CALL, EVENT_TOOL_RESULT};
use super::trace::Trace;

/// Shared ownership lets the same identity sign trace events here and
/// whatever else the owning executor needs it for (e.g. the final proof
/// bundle signature), without cloning secret key material.
pub struct TraceRecorder {
    trace: Mutex<Trace>,
    identity: Arc<AgentIdentity>,
}

impl TraceRecorder {
    pub fn new(trace: Trace, identity: Arc<AgentIdentity>) -> Self {
        Self { trace: Mutex::new(trace), identity }
    }

    pub fn with_trace<T>(&self, f: impl FnOnce(&Trace) -> T) -> T {
        f(&self.trace.lock())
    }

    /// General-purpose append, for events the gateway itself doesn't
    /// know how to emit (e.g. `TASK_ACCEPTED`, `POLICY_VIOLATION`).
    pub fn append(&self, event_type: &str, data: serde_json::Value) -> Result<(), super::errors::TraceError> {
        self.trace.lock().append(event_type, data, &self.identity).map(|_| ())
    }

    pub fn finalize(&self, result: serde_json::Value) -> Result<(), super::errors::TraceError> {
        self.trace.lock().finalize(result)
    }

    pub fn fail(&self, error: serde_json::Value) -> Result<(), super::errors::TraceError> {
        self.trace.lock().fail(error)
    }

    pub fn into_inner(self) -> Trace {
        self.trace.into_inner()
    }
}

#[async_trait]
impl TraceSink for TraceRecorder {
    async fn record_tool_call(&self, tool: &str, input_hash: &str) {
        let mut trace = self.trace.lock();
        let _ = trace.append(EVENT_TOOL_CALL, json!({"tool": tool, "inputHash": input_hash}), &self.identity);
    }

    async fn record_tool_result(&self, tool: &str, output_hash: &str, status: &str, duration_ms: u64) {
        let mut trace = self.trace.lock();
        let _ = trace.append(
            EVENT_TOOL_RESULT,
            json!({"tool": tool, "outputHash": output_hash, "status": status, "durationMs": duration_ms}),
            &self.identity,
        );
    }

    async fn record_policy_violation(&self, tool: &str, reason: &str) {
        let mut trace = self.trace.lock();
        let _ = trace.append(EVENT_POLICY_VIOLATION, json!({"tool": tool, "reason": reason}), &self.identity);
    }
}
