//! # Trace Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EVENT_TASK_ACCEPTED: &str = "TASK_ACCEPTED";
pub const EVENT_TOOL_CALL: &str = "TOOL_CALL";
pub const EVENT_TOOL_RESULT: &str = "TOOL_RESULT";
pub const EVENT_POLICY_CHECK: &str = "POLICY_CHECK";
pub const EVENT_POLICY_VIOLATION: &str = "POLICY_VIOLATION";
pub const EVENT_CHECKPOINT: &str = "CHECKPOINT";
pub const EVENT_TASK_RESULT: &str = "TASK_RESULT";
pub const EVENT_TASK_FAILED: &str = "TASK_FAILED";
pub const EVENT_ROLLBACK: &str = "ROLLBACK";

/// Fixed hash standing in for `prev` on the very first event.
pub const GENESIS_PREV: &str = "0x00";

/// Default number of events between automatically-inserted checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: u64 = 50;

/// Where an execution trace is in its lifecycle (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceState {
    Open,
    Finalized,
    Failed,
}

/// One append-only event in a trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub ts: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: Value,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

/// Payload of a `CHECKPOINT` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointData {
    #[serde(rename = "merkleRoot")]
    pub merkle_root: String,
    #[serde(rename = "eventCount")]
    pub event_count: u64,
    #[serde(rename = "toolCalls")]
    pub tool_calls: u64,
    #[serde(rename = "lastHash")]
    pub last_hash: String,
}

/// Outcome of [`crate::domain::trace::Trace::verify`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerificationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl VerificationReport {
    pub fn ok() -> Self {
        Self { valid: true, errors: Vec::new() }
    }
}

/// `{seq, hash, sig}` triple extracted from a checkpoint event, embedded in
/// a proof bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRef {
    pub seq: u64,
    pub hash: String,
    pub sig: String,
}

/// The proof bundle wire-format version this workspace emits.
pub const PROOF_BUNDLE_VERSION: &str = "proof.bundle.v0.1";

/// One open-ended `{type, value}` attestation entry carried inside a proof
/// bundle, rather than a fixed-shape struct — a verifier can recognize the
/// attestation types it understands and ignore the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    #[serde(rename = "type")]
    pub attestation_type: String,
    pub value: Value,
}

impl Attestation {
    pub fn new(attestation_type: impl Into<String>, value: Value) -> Self {
        Self { attestation_type: attestation_type.into(), value }
    }
}

/// A detached Ed25519 signature over a proof bundle body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    pub alg: String,
    pub sig: String,
}

impl Signature {
    pub fn ed25519(sig: impl Into<String>) -> Self {
        Self { alg: "Ed25519".to_string(), sig: sig.into() }
    }
}

/// A signed, verifiable summary of one completed execution (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBundle {
    #[serde(rename = "proofId")]
    pub proof_id: String,
    pub version: String,
    pub executor: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "traceRoot")]
    pub trace_root: String,
    #[serde(rename = "traceLength")]
    pub trace_length: u64,
    pub checkpoints: Vec<CheckpointRef>,
    #[serde(rename = "policyRef")]
    pub policy_ref: String,
    #[serde(rename = "consentRef")]
    pub consent_ref: String,
    #[serde(rename = "resultRef")]
    pub result_ref: String,
    pub timestamp: DateTime<Utc>,
    pub attestations: Vec<Attestation>,
    pub signature: Signature,
}

/// The subset of [`ProofBundle`] that is actually signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofBundleBody {
    #[serde(rename = "proofId")]
    pub proof_id: String,
    pub version: String,
    pub executor: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "traceRoot")]
    pub trace_root: String,
    #[serde(rename = "traceLength")]
    pub trace_length: u64,
    pub checkpoints: Vec<CheckpointRef>,
    #[serde(rename = "policyRef")]
    pub policy_ref: String,
    #[serde(rename = "consentRef")]
    pub consent_ref: String,
    #[serde(rename = "resultRef")]
    pub result_ref: String,
    pub timestamp: DateTime<Utc>,
    pub attestations: Vec<Attestation>,
}

impl From<&ProofBundle> for ProofBundleBody {
    fn from(b: &ProofBundle) -> Self {
        Self {
            proof_id: b.proof_id.clone(),
            version: b.version.clone(),
            executor: b.executor.clone(),
            task_id: b.task_id.clone(),
            trace_root: b.trace_root.clone(),
            trace_length: b.trace_length,
            checkpoints: b.checkpoints.clone(),
            policy_ref: b.policy_ref.clone(),
            consent_ref: b.consent_ref.clone(),
            result_ref: b.result_ref.clone(),
            timestamp: b.timestamp,
            attestations: b.attestations.clone(),
        }
    }
}

/// A single named check performed while verifying a proof bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The structured report returned by independent proof-bundle verification
/// (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProofVerificationReport {
    pub valid: bool,
    pub checks: Vec<CheckResult>,
}
