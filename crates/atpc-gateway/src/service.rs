//! # Tool Gateway Service
//!
//! The single chokepoint for tool invocation: every call passes through
//! policy evaluation before a handler ever runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use atpc_consent::{PolicyDecision, PolicyEngine, ProposedAction, RiskLevel};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::domain::entities::{CallLogEntry, CallStatus, ToolCallRequest, ToolCallResult};
use crate::domain::errors::GatewayError;
use crate::domain::hashing::hash_canonical;
use crate::domain::tool_name::parse_tool_name;
use crate::ports::inbound::ToolGatewayApi;
use crate::ports::outbound::{TraceSink, ToolHandler};

pub struct ToolGateway {
    handlers: RwLock<HashMap<String, Arc<dyn ToolHandler>>>,
    policy: Arc<PolicyEngine>,
    trace_sink: Option<Arc<dyn TraceSink>>,
    call_log: Mutex<Vec<CallLogEntry>>,
}

impl ToolGateway {
    pub fn new(policy: Arc<PolicyEngine>, trace_sink: Option<Arc<dyn TraceSink>>) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            policy,
            trace_sink,
            call_log: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, name: impl Into<String>, handler: Arc<dyn ToolHandler>) -> Result<(), GatewayError> {
        let name = name.into();
        let mut handlers = self.handlers.write();
        if handlers.contains_key(&name) {
            return Err(GatewayError::DuplicateRegistration { tool: name });
        }
        handlers.insert(name, handler);
        Ok(())
    }

    pub fn call_log(&self) -> Vec<CallLogEntry> {
        self.call_log.lock().clone()
    }

    fn default_data_scope(&self) -> String {
        self.policy
            .token()
            .scopes
            .iter()
            .find_map(|s| s.strip_prefix("data:"))
            .map(str::to_string)
            .unwrap_or_else(|| "*".to_string())
    }
}

#[async_trait]
impl ToolGatewayApi for ToolGateway {
    async fn call_tool(&self, request: ToolCallRequest) -> Result<ToolCallResult, GatewayError> {
        let handler = {
            let handlers = self.handlers.read();
            handlers
                .get(&request.tool)
                .cloned()
                .ok_or_else(|| GatewayError::ToolNotFound(request.tool.clone()))?
        };

        let (category, method) = parse_tool_name(&request.tool);
        let data_scope = request.data_scope.clone().unwrap_or_else(|| self.default_data_scope());
        let action = ProposedAction { tool: category, method, data_scope };
        let requested_risk = request.risk_level.unwrap_or(RiskLevel::Low);

        match self.policy.evaluate(&action, requested_risk) {
            PolicyDecision::Allow => {}
            PolicyDecision::NeedsConfirm => {
                let reason = format!(
                    "requested risk {:?} needs confirmation for tool {}",
                    requested_risk, request.tool
                );
                if let Some(sink) = &self.trace_sink {
                    sink.record_policy_violation(&request.tool, &reason).await;
                }
                return Err(GatewayError::ConfirmationRequired(reason));
            }
            PolicyDecision::Deny(reason) => {
                tracing::warn!(tool = %request.tool, %reason, "tool call denied by policy");
                if let Some(sink) = &self.trace_sink {
                    sink.record_policy_violation(&request.tool, &reason).await;
                }
                return Err(GatewayError::Unauthorized(reason));
            }
        }

        if self.policy.record_call().is_err() {
            let reason = "no calls remaining".to_string();
            if let Some(sink) = &self.trace_sink {
                sink.record_policy_violation(&request.tool, &reason).await;
            }
            return Err(GatewayError::Unauthorized(reason));
        }

        let input_hash = hash_canonical(&request.input);
        if let Some(sink) = &self.trace_sink {
            sink.record_tool_call(&request.tool, &input_hash).await;
        }

        let start = Instant::now();
        let (output, status) = match handler.call(request.input.clone()).await {
            Ok(output) => (output, CallStatus::Ok),
            Err(message) => (serde_json::json!({"error": message}), CallStatus::Error),
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        let output_hash = hash_canonical(&output);
        if let Some(sink) = &self.trace_sink {
            let status_str = match status {
                CallStatus::Ok => "ok",
                CallStatus::Error => "error",
                CallStatus::Timeout => "timeout",
            };
            sink.record_tool_result(&request.tool, &output_hash, status_str, duration_ms).await;
        }

        tracing::debug!(tool = %request.tool, ?status, duration_ms, "tool call completed");
        self.call_log.lock().push(CallLogEntry {
            tool: request.tool,
            status,
            duration_ms,
            timestamp: Utc::now(),
        });

        Ok(ToolCallResult { output, status, duration_ms, input_hash, output_hash })
    }
}
