//! # Envelope Entities
//!
//! The `atel.msg.v1` wire envelope: a signed wrapper carrying one of the
//! enumerated protocol message kinds between two DIDs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag value for the current envelope wire format.
pub const ENVELOPE_TAG: &str = "atel.msg.v1";

/// The enumerated message kinds a signed envelope may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeType {
    HandshakeInit,
    HandshakeAck,
    HandshakeConfirm,
    Task,
    #[serde(rename = "task-result")]
    TaskResult,
    Proof,
    TrustQuery,
}

impl EnvelopeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvelopeType::HandshakeInit => "handshake_init",
            EnvelopeType::HandshakeAck => "handshake_ack",
            EnvelopeType::HandshakeConfirm => "handshake_confirm",
            EnvelopeType::Task => "task",
            EnvelopeType::TaskResult => "task-result",
            EnvelopeType::Proof => "proof",
            EnvelopeType::TrustQuery => "trust_query",
        }
    }
}

/// A signed message envelope on the wire.
///
/// `signature` is computed (and verified) over every other field,
/// canonicalized with `signature` absent from the object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub envelope: String,
    #[serde(rename = "type")]
    pub msg_type: EnvelopeType,
    pub id: String,
    pub from: String,
    pub to: String,
    pub timestamp: String,
    pub nonce: String,
    pub payload: Value,
    pub signature: String,
}

/// The subset of [`Envelope`] that is actually signed (everything but
/// `signature`). Kept as a distinct type so the signed bytes can be
/// reconstructed identically on both the signing and verifying side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeBody {
    pub envelope: String,
    #[serde(rename = "type")]
    pub msg_type: EnvelopeType,
    pub id: String,
    pub from: String,
    pub to: String,
    pub timestamp: String,
    pub nonce: String,
    pub payload: Value,
}

impl From<&Envelope> for EnvelopeBody {
    fn from(e: &Envelope) -> Self {
        Self {
            envelope: e.envelope.clone(),
            msg_type: e.msg_type,
            id: e.id.clone(),
            from: e.from.clone(),
            to: e.to.clone(),
            timestamp: e.timestamp.clone(),
            nonce: e.nonce.clone(),
            payload: e.payload.clone(),
        }
    }
}

/// Outcome of [`super::verify::verify_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub valid: bool,
    pub error: Option<String>,
}

impl VerificationOutcome {
    pub fn ok() -> Self {
        Self { valid: true, error: None }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self { valid: false, error: Some(error.into()) }
    }
}
