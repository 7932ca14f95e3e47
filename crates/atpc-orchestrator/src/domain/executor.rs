//! # Executor
//!
//! Verifies an incoming task and consent token, opens a trace, constructs
//! a policy-bound gateway, runs caller-supplied work through it, finalizes
//! the trace, and produces a signed proof bundle.

use std::future::Future;
use std::sync::Arc;

use atpc_consent::{verify as verify_consent, ConsentToken, PolicyEngine};
use atpc_envelope::{verify_message, Envelope, EnvelopeError, VerifyOptions};
use atpc_gateway::{GatewayError, ToolGateway};
use atpc_identity::{parse_did, AgentIdentity};
use atpc_trace::{generate_proof_bundle, ProofBundle, Trace, TraceRecorder, EVENT_POLICY_VIOLATION, EVENT_TASK_ACCEPTED};
use atpc_trust::ExecutionSummary;
use chrono::Utc;
use serde_json::{json, Value};

use super::config::OrchestratorConfig;
use super::errors::OrchestratorError;

pub struct Executor {
    identity: Arc<AgentIdentity>,
    config: OrchestratorConfig,
}

/// What a completed execution hands back for bookkeeping: the proof
/// bundle, the trace it was built from (needed for independent
/// re-verification), and the summary ready to feed into trust accounting.
pub struct ExecutionOutput {
    pub bundle: ProofBundle,
    pub trace: Trace,
    pub summary: ExecutionSummary,
}

impl Executor {
    pub fn new(identity: AgentIdentity, config: OrchestratorConfig) -> Self {
        Self { identity: Arc::new(identity), config }
    }

    pub fn did(&self) -> &str {
        &self.identity.did
    }

    /// Runs one delegated task end to end. `register` attaches tool
    /// handlers to the freshly built gateway before `work` runs against it.
    /// A failing `work` still produces a proof bundle and a summary with
    /// `success: false` (the trace ends in `TASK_FAILED` rather than
    /// `TASK_RESULT`) — the `Err` variant is reserved for failures in the
    /// surrounding protocol machinery, not in the delegated work itself, so
    /// trust accounting always has something to feed on.
    pub async fn execute<F, Fut>(
        &self,
        task_envelope: &Envelope,
        task_id: impl Into<String>,
        task_type: impl Into<String>,
        consent_token: &ConsentToken,
        register: impl FnOnce(&ToolGateway) -> Result<(), GatewayError>,
        work: F,
    ) -> Result<ExecutionOutput, OrchestratorError>
    where
        F: FnOnce(Arc<ToolGateway>) -> Fut,
        Fut: Future<Output = Result<Value, String>>,
    {
        let task_id = task_id.into();
        let task_type = task_type.into();

        let delegator_pub = parse_did(&task_envelope.from)?;
        let outcome = verify_message(task_envelope, &delegator_pub, VerifyOptions::default());
        if !outcome.valid {
            return Err(OrchestratorError::Envelope(EnvelopeError::InvalidSignature));
        }

        let issuer_pub = parse_did(&consent_token.iss)?;
        verify_consent(consent_token, &issuer_pub)?;

        let policy = Arc::new(PolicyEngine::new(consent_token.clone()));

        let trace = Trace::with_checkpoint_interval(self.identity.public_key, self.config.trace_checkpoint_interval);
        let recorder = Arc::new(TraceRecorder::new(trace, self.identity.clone()));
        recorder.append(EVENT_TASK_ACCEPTED, task_envelope.payload.clone())?;

        let trace_sink: Arc<dyn atpc_gateway::TraceSink> = recorder.clone();
        let gateway = Arc::new(ToolGateway::new(policy.clone(), Some(trace_sink)));
        register(&gateway).map_err(OrchestratorError::Gateway)?;

        let work_result = work(gateway.clone()).await;

        let (result_for_summary, task_failed_error) = match &work_result {
            Ok(result) => {
                recorder.finalize(result.clone())?;
                (result.clone(), None)
            }
            Err(message) => {
                recorder.fail(json!({"error": message}))?;
                (json!({"error": message}), Some(message.clone()))
            }
        };

        let call_log = gateway.call_log();
        let tool_calls = call_log.len() as u32;
        let total_duration_ms: u64 = call_log.iter().map(|c| c.duration_ms).sum();
        drop(gateway);

        let recorder = Arc::try_unwrap(recorder)
            .unwrap_or_else(|shared| panic!("trace recorder still has {} outstanding references", Arc::strong_count(&shared)));
        let trace = recorder.into_inner();

        let policy_violations =
            trace.events().iter().filter(|e| e.event_type == EVENT_POLICY_VIOLATION).count() as u32;

        let bundle = generate_proof_bundle(
            &trace,
            &self.identity,
            task_id.clone(),
            &json!({"token": policy.token()}),
            &json!(consent_token),
            &result_for_summary,
        );

        let summary = ExecutionSummary {
            executor: self.identity.did.clone(),
            task_id,
            task_type,
            risk_level: consent_token.risk_ceiling,
            success: task_failed_error.is_none(),
            duration_ms: total_duration_ms,
            tool_calls,
            policy_violations,
            proof_id: bundle.proof_id.clone(),
            timestamp: Utc::now(),
        };

        match &task_failed_error {
            Some(message) => {
                tracing::warn!(task_id = %summary.task_id, error = %message, "task execution failed");
            }
            None => {
                tracing::info!(task_id = %summary.task_id, tool_calls = summary.tool_calls, "task execution finalized");
            }
        }

        Ok(ExecutionOutput { bundle, trace, summary })
    }
}
