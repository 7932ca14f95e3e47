//! # Execution Trace & Proof Subsystem (C7)
//!
//! Append-only, hash-chained execution traces with auto-inserted signed
//! checkpoints, and the signed proof bundles a verifier can check against
//! them independently of the executor who produced them.

pub mod domain;

pub use domain::entities::{
    Attestation, CheckResult, CheckpointData, CheckpointRef, Event, ProofBundle, ProofBundleBody,
    ProofVerificationReport, Signature, TraceState, VerificationReport, DEFAULT_CHECKPOINT_INTERVAL,
    EVENT_CHECKPOINT, EVENT_POLICY_CHECK, EVENT_POLICY_VIOLATION, EVENT_ROLLBACK,
    EVENT_TASK_ACCEPTED, EVENT_TASK_FAILED, EVENT_TASK_RESULT, EVENT_TOOL_CALL, EVENT_TOOL_RESULT,
    GENESIS_PREV, PROOF_BUNDLE_VERSION,
};
pub use domain::errors::{ProofError, TraceError};
pub use domain::hashing::{event_hash, hash_data, merkle_root};
pub use domain::proof::{generate_proof_bundle, proof_bundle_error_if_missing, verify_proof_bundle};
pub use domain::sink::TraceRecorder;
pub use domain::trace::Trace;
