//! # Proof Bundles
//!
//! A proof bundle is a signed, portable summary of one completed execution
//! that a verifier can check without replaying the full trace, beyond
//! recomputing the Merkle root over the trace's event hashes.

use atpc_identity::{canonicalize, parse_did, sign, verify as verify_signature, AgentIdentity};
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::entities::{
    Attestation, CheckResult, CheckpointRef, ProofBundle, ProofBundleBody, ProofVerificationReport,
    Signature, EVENT_CHECKPOINT, PROOF_BUNDLE_VERSION,
};
use super::errors::ProofError;
use super::trace::Trace;

fn hash_ref<T: serde::Serialize>(value: &T) -> String {
    let bytes = canonicalize(value).unwrap_or_default();
    hex::encode(Sha256::digest(&bytes))
}

/// Builds and signs a proof bundle for a (typically finalized) trace.
///
/// Per the resolved design decision, `traceRoot` commits to every event
/// hash in the trace, including any trailing `CHECKPOINT` event's own hash
/// — it is not filtered down to exclude checkpoints.
pub fn generate_proof_bundle(
    trace: &Trace,
    executor: &AgentIdentity,
    task_id: impl Into<String>,
    policy: &Value,
    consent: &Value,
    result: &Value,
) -> ProofBundle {
    let checkpoints: Vec<CheckpointRef> = trace
        .events()
        .iter()
        .filter(|e| e.event_type == EVENT_CHECKPOINT)
        .map(|e| CheckpointRef {
            seq: e.seq,
            hash: e.hash.clone(),
            sig: e.sig.clone().unwrap_or_default(),
        })
        .collect();

    let verification = trace.verify();

    let attestations = vec![
        Attestation::new("trace_verified", Value::Bool(verification.valid)),
        Attestation::new("event_count", Value::from(trace.len())),
        Attestation::new(
            "finalized",
            Value::Bool(matches!(trace.state(), super::entities::TraceState::Finalized)),
        ),
    ];

    let body = ProofBundleBody {
        proof_id: Uuid::new_v4().to_string(),
        version: PROOF_BUNDLE_VERSION.to_string(),
        executor: executor.did.clone(),
        task_id: task_id.into(),
        trace_root: trace.trace_root(),
        trace_length: trace.len(),
        checkpoints,
        policy_ref: hash_ref(policy),
        consent_ref: hash_ref(consent),
        result_ref: hash_ref(result),
        timestamp: Utc::now(),
        attestations,
    };

    let sig = sign(&body, executor).unwrap_or_default();

    ProofBundle {
        proof_id: body.proof_id,
        version: body.version,
        executor: body.executor,
        task_id: body.task_id,
        trace_root: body.trace_root,
        trace_length: body.trace_length,
        checkpoints: body.checkpoints,
        policy_ref: body.policy_ref,
        consent_ref: body.consent_ref,
        result_ref: body.result_ref,
        timestamp: body.timestamp,
        attestations: body.attestations,
        signature: Signature::ed25519(sig),
    }
}

/// Independently verifies a proof bundle against the trace it claims to
/// summarize, performing each check from the design in isolation so a
/// caller can see exactly which one failed.
pub fn verify_proof_bundle(bundle: &ProofBundle, trace: &Trace) -> ProofVerificationReport {
    let mut checks = Vec::new();

    let structure_ok = !bundle.executor.is_empty()
        && !bundle.task_id.is_empty()
        && !bundle.policy_ref.is_empty()
        && !bundle.consent_ref.is_empty()
        && !bundle.result_ref.is_empty();
    checks.push(CheckResult {
        name: "structure".to_string(),
        passed: structure_ok,
        detail: if structure_ok { None } else { Some("one or more required reference fields is empty".to_string()) },
    });

    let executor_key = parse_did(&bundle.executor);
    let signature_ok = match &executor_key {
        Ok(public_key) => {
            let body = ProofBundleBody::from(bundle);
            verify_signature(&body, &bundle.signature.sig, public_key)
        }
        Err(_) => false,
    };
    checks.push(CheckResult {
        name: "signature".to_string(),
        passed: signature_ok,
        detail: if signature_ok {
            None
        } else if executor_key.is_err() {
            Some("executor DID could not be parsed".to_string())
        } else {
            Some("signature did not validate".to_string())
        },
    });

    let replay = trace.verify();
    let length_matches = trace.len() == bundle.trace_length;
    let trace_ok = replay.valid && length_matches;
    checks.push(CheckResult {
        name: "trace-self-consistency".to_string(),
        passed: trace_ok,
        detail: if trace_ok {
            None
        } else {
            Some(format!(
                "replay valid={}, trace length {} vs bundle {}",
                replay.valid,
                trace.len(),
                bundle.trace_length
            ))
        },
    });

    let recomputed_root = trace.trace_root();
    let root_ok = recomputed_root == bundle.trace_root;
    checks.push(CheckResult {
        name: "merkle-root".to_string(),
        passed: root_ok,
        detail: if root_ok { None } else { Some("recomputed trace root does not match bundle".to_string()) },
    });

    let checkpoints_ok = bundle.checkpoints.iter().all(|cp| {
        let event = trace.events().iter().find(|e| e.seq == cp.seq);
        match event {
            Some(event) if event.hash == cp.hash => verify_signature(&cp.hash, &cp.sig, trace.identity_public_key()),
            _ => false,
        }
    });
    checks.push(CheckResult {
        name: "checkpoints".to_string(),
        passed: checkpoints_ok,
        detail: if checkpoints_ok { None } else { Some("a checkpoint hash or signature did not match the trace".to_string()) },
    });

    let refs_ok = !bundle.policy_ref.is_empty() && !bundle.consent_ref.is_empty() && !bundle.result_ref.is_empty();
    checks.push(CheckResult {
        name: "references".to_string(),
        passed: refs_ok,
        detail: if refs_ok { None } else { Some("one or more references is empty".to_string()) },
    });

    let valid = checks.iter().all(|c| c.passed);
    ProofVerificationReport { valid, checks }
}

pub fn proof_bundle_error_if_missing(bundle: &ProofBundle) -> Result<(), ProofError> {
    if bundle.executor.is_empty() {
        return Err(ProofError::MissingField("executor"));
    }
    if bundle.task_id.is_empty() {
        return Err(ProofError::MissingField("taskId"));
    }
    if bundle.policy_ref.is_empty() {
        return Err(ProofError::MissingField("policyRef"));
    }
    if bundle.consent_ref.is_empty() {
        return Err(ProofError::MissingField("consentRef"));
    }
    if bundle.result_ref.is_empty() {
        return Err(ProofError::MissingField("resultRef"));
    }
    Ok(())
}
