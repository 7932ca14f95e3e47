//! # Delegator
//!
//! Mints a signed task envelope and a consent token bounding what the
//! chosen executor may do with it, and independently re-verifies the
//! proof bundle an executor hands back. Before delegating, checks the
//! executor's trust score against the risk it's being asked to carry.

use atpc_consent::{mint, ConsentToken, MintOptions, RiskLevel};
use atpc_envelope::{build_envelope, Envelope, EnvelopeType};
use atpc_identity::AgentIdentity;
use atpc_trace::{verify_proof_bundle, ProofBundle, ProofVerificationReport, Trace};
use atpc_trust::{RiskFlag, ScoreReport, ScoreStore};
use serde_json::json;

use super::entities::{BlockedReport, GrantOptions, TaskIntent};
use super::errors::OrchestratorError;

pub struct Delegator {
    identity: AgentIdentity,
}

/// Minimum reputation score an executor needs before a task at this risk
/// level will be delegated to it. An executor with no history yet (zero
/// recorded tasks) is unproven rather than untrusted, and is never
/// blocked by this gate — the score check only bites once there's a
/// track record to judge.
fn min_score_for_risk(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 0.0,
        RiskLevel::Medium => 40.0,
        RiskLevel::High => 60.0,
        RiskLevel::Critical => 80.0,
    }
}

/// Checks `report` against the trust bar `requested_risk` requires,
/// returning the block reason if the executor doesn't clear it.
fn trust_gate(report: &ScoreReport, requested_risk: RiskLevel) -> Option<BlockedReport> {
    if report.total_tasks == 0 {
        return None;
    }

    let floor = min_score_for_risk(requested_risk);
    if report.score < floor {
        return Some(BlockedReport::new(
            format!("score {:.2} is below the {floor:.2} floor required for {requested_risk:?} risk"),
            report.score,
            requested_risk,
        ));
    }

    if requested_risk.level() >= RiskLevel::High.level() && report.flags.contains(&RiskFlag::HasViolations) {
        return Some(BlockedReport::new(
            format!("executor has recorded policy violations; {requested_risk:?} risk requires a clean record"),
            report.score,
            requested_risk,
        ));
    }

    None
}

impl Delegator {
    pub fn new(identity: AgentIdentity) -> Self {
        Self { identity }
    }

    pub fn did(&self) -> &str {
        &self.identity.did
    }

    /// Builds a signed `Task` envelope plus a matching consent token for
    /// `executor_did`, after checking its recorded trust score against the
    /// intent's risk level. Returns `OrchestratorError::Blocked` instead of
    /// minting anything if the executor doesn't clear the bar.
    pub fn delegate(
        &self,
        executor_did: impl Into<String>,
        intent: &TaskIntent,
        grant: GrantOptions,
        trust: &ScoreStore,
    ) -> Result<(Envelope, ConsentToken), OrchestratorError> {
        let executor_did = executor_did.into();

        let report = trust.score(&executor_did);
        if let Some(blocked) = trust_gate(&report, intent.risk) {
            return Err(OrchestratorError::Blocked {
                reason: blocked.reason,
                score: blocked.score,
                requested_risk: blocked.requested_risk,
            });
        }

        let envelope = build_envelope(
            &self.identity,
            EnvelopeType::Task,
            executor_did.clone(),
            json!(intent),
        )?;

        let token = mint(
            &self.identity,
            executor_did,
            intent.scopes.clone(),
            MintOptions { max_calls: grant.max_calls, ttl_sec: grant.ttl_sec },
            risk_ceiling_for(intent.risk),
        )?;

        Ok((envelope, token))
    }

    /// Independently re-verifies a proof bundle against the trace that
    /// produced it: signature, hash-chain, Merkle root, checkpoint
    /// signatures, and reference presence.
    pub fn verify_execution(&self, bundle: &ProofBundle, trace: &Trace) -> ProofVerificationReport {
        verify_proof_bundle(bundle, trace)
    }
}

/// The risk ceiling granted is never below the intent's own risk level —
/// an executor must be able to carry out the work it was asked to do.
fn risk_ceiling_for(intent_risk: RiskLevel) -> RiskLevel {
    intent_risk
}

#[cfg(test)]
mod tests {
    use super::*;
    use atpc_trust::ExecutionSummary;
    use chrono::Utc;
    use std::collections::HashMap;

    fn intent(risk: RiskLevel) -> TaskIntent {
        TaskIntent {
            intent_type: "test".to_string(),
            risk,
            scopes: vec!["tool:http:get".to_string()],
            max_cost: 0.01,
            params: json!({}),
        }
    }

    fn summary(executor: &str, success: bool, violations: u32) -> ExecutionSummary {
        ExecutionSummary {
            executor: executor.to_string(),
            task_id: "t".to_string(),
            task_type: "test".to_string(),
            risk_level: RiskLevel::Low,
            success,
            duration_ms: 10,
            tool_calls: 1,
            policy_violations: violations,
            proof_id: "p".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn unproven_executor_is_never_blocked() {
        let delegator = Delegator::new(AgentIdentity::generate("delegator", HashMap::new()));
        let trust = ScoreStore::new();
        let result = delegator.delegate(
            "did:atpc:ed25519:executor",
            &intent(RiskLevel::Critical),
            GrantOptions { max_calls: 1, ttl_sec: 60 },
            &trust,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn low_score_blocks_high_risk_delegation() {
        let delegator = Delegator::new(AgentIdentity::generate("delegator", HashMap::new()));
        let trust = ScoreStore::new();
        for _ in 0..10 {
            trust.submit(summary("bad-executor", false, 0)).unwrap();
        }
        let result = delegator.delegate(
            "bad-executor",
            &intent(RiskLevel::High),
            GrantOptions { max_calls: 1, ttl_sec: 60 },
            &trust,
        );
        assert!(matches!(result, Err(OrchestratorError::Blocked { .. })));
    }

    #[test]
    fn good_score_allows_high_risk_delegation() {
        let delegator = Delegator::new(AgentIdentity::generate("delegator", HashMap::new()));
        let trust = ScoreStore::new();
        for _ in 0..10 {
            trust.submit(summary("good-executor", true, 0)).unwrap();
        }
        let result = delegator.delegate(
            "good-executor",
            &intent(RiskLevel::High),
            GrantOptions { max_calls: 1, ttl_sec: 60 },
            &trust,
        );
        assert!(result.is_ok());
    }
}
