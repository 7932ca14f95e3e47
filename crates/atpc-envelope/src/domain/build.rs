//! # Envelope Construction

use atpc_identity::{sign, AgentIdentity};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::entities::{Envelope, EnvelopeBody, EnvelopeType, ENVELOPE_TAG};
use super::errors::EnvelopeError;

/// Builds and signs a new envelope from `identity`, addressed `to` a remote
/// DID, carrying `payload`.
pub fn build_envelope(
    identity: &AgentIdentity,
    msg_type: EnvelopeType,
    to: impl Into<String>,
    payload: Value,
) -> Result<Envelope, EnvelopeError> {
    let body = EnvelopeBody {
        envelope: ENVELOPE_TAG.to_string(),
        msg_type,
        id: Uuid::new_v4().to_string(),
        from: identity.did.clone(),
        to: to.into(),
        timestamp: Utc::now().to_rfc3339(),
        nonce: Uuid::new_v4().to_string(),
        payload,
    };

    let signature = sign(&body, identity).map_err(|_| EnvelopeError::InvalidSignature)?;

    Ok(Envelope {
        envelope: body.envelope,
        msg_type: body.msg_type,
        id: body.id,
        from: body.from,
        to: body.to,
        timestamp: body.timestamp,
        nonce: body.nonce,
        payload: body.payload,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn builds_a_well_formed_envelope() {
        let identity = AgentIdentity::generate("agent-a", HashMap::new());
        let env = build_envelope(
            &identity,
            EnvelopeType::Task,
            "did:atel:ed25519:recipient",
            serde_json::json!({"hello": "world"}),
        )
        .unwrap();

        assert_eq!(env.envelope, ENVELOPE_TAG);
        assert_eq!(env.from, identity.did);
        assert!(!env.signature.is_empty());
    }
}
