//! # Envelope Verification

use atpc_identity::verify as verify_signature;
use chrono::{DateTime, Utc};

use super::entities::{Envelope, EnvelopeBody, VerificationOutcome};

/// Default maximum age (§4.2): five minutes.
pub const DEFAULT_MAX_AGE_MS: i64 = 5 * 60 * 1000;

/// Options controlling [`verify_message`].
#[derive(Debug, Clone, Copy)]
pub struct VerifyOptions {
    pub max_age_ms: i64,
    pub skip_timestamp_check: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
            skip_timestamp_check: false,
        }
    }
}

/// Verifies an envelope against the declared sender's public key.
///
/// Checks run in order: (1) required fields are present and well-formed,
/// (2) the timestamp is within `max_age_ms` of now unless
/// `skip_timestamp_check` is set, (3) the signature validates over the
/// canonical body.
pub fn verify_message(
    msg: &Envelope,
    public_key: &[u8; 32],
    opts: VerifyOptions,
) -> VerificationOutcome {
    if msg.envelope.is_empty() {
        return VerificationOutcome::fail("missing field: envelope");
    }
    if msg.id.is_empty() {
        return VerificationOutcome::fail("missing field: id");
    }
    if msg.from.is_empty() {
        return VerificationOutcome::fail("missing field: from");
    }
    if msg.to.is_empty() {
        return VerificationOutcome::fail("missing field: to");
    }
    if msg.nonce.is_empty() {
        return VerificationOutcome::fail("missing field: nonce");
    }
    if msg.signature.is_empty() {
        return VerificationOutcome::fail("missing field: signature");
    }

    if !opts.skip_timestamp_check {
        let ts = match DateTime::parse_from_rfc3339(&msg.timestamp) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(_) => return VerificationOutcome::fail("invalid timestamp"),
        };
        let age_ms = (Utc::now() - ts).num_milliseconds().abs();
        if age_ms > opts.max_age_ms {
            return VerificationOutcome::fail("timestamp outside allowed window");
        }
    }

    let body = EnvelopeBody::from(msg);
    if !verify_signature(&body, &msg.signature, public_key) {
        return VerificationOutcome::fail("signature verification failed");
    }

    VerificationOutcome::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::build::build_envelope;
    use crate::domain::entities::EnvelopeType;
    use atpc_identity::AgentIdentity;
    use std::collections::HashMap;

    fn identity() -> AgentIdentity {
        AgentIdentity::generate("agent-a", HashMap::new())
    }

    #[test]
    fn valid_envelope_verifies() {
        let id = identity();
        let env = build_envelope(&id, EnvelopeType::Task, "did:atel:ed25519:x", serde_json::json!({})).unwrap();
        let outcome = verify_message(&env, &id.public_key, VerifyOptions::default());
        assert!(outcome.valid);
    }

    #[test]
    fn tampered_payload_fails() {
        let id = identity();
        let mut env =
            build_envelope(&id, EnvelopeType::Task, "did:atel:ed25519:x", serde_json::json!({"a": 1}))
                .unwrap();
        env.payload = serde_json::json!({"a": 2});
        let outcome = verify_message(&env, &id.public_key, VerifyOptions::default());
        assert!(!outcome.valid);
    }

    #[test]
    fn stale_timestamp_fails() {
        let id = identity();
        let mut env =
            build_envelope(&id, EnvelopeType::Task, "did:atel:ed25519:x", serde_json::json!({})).unwrap();
        env.timestamp = (Utc::now() - chrono::Duration::hours(2)).to_rfc3339();
        let outcome = verify_message(&env, &id.public_key, VerifyOptions::default());
        assert!(!outcome.valid);
        assert!(outcome.error.unwrap().contains("timestamp"));
    }

    #[test]
    fn skip_timestamp_check_allows_stale() {
        let id = identity();
        let mut env =
            build_envelope(&id, EnvelopeType::Task, "did:atel:ed25519:x", serde_json::json!({})).unwrap();
        env.timestamp = (Utc::now() - chrono::Duration::hours(2)).to_rfc3339();
        let opts = VerifyOptions { skip_timestamp_check: true, ..Default::default() };
        let outcome = verify_message(&env, &id.public_key, opts);
        assert!(outcome.valid);
    }

    #[test]
    fn wrong_key_fails() {
        let id = identity();
        let other = identity();
        let env = build_envelope(&id, EnvelopeType::Task, "did:atel:ed25519:x", serde_json::json!({})).unwrap();
        let outcome = verify_message(&env, &other.public_key, VerifyOptions::default());
        assert!(!outcome.valid);
    }
}
