//! # Key Rotation
//!
//! A [`KeyRotationProof`] links an old identity to a new one: both the old
//! and new secret keys sign the same body, so a verifier trusting either
//! DID can confirm the rotation independently.

use chrono::Utc;
use ed25519_dalek::SigningKey;
use std::collections::HashMap;

use super::did::parse_did;
use super::entities::{AgentIdentity, KeyRotationProof, KeyRotationProofBody};
use super::signing::{sign, verify};

/// Rotates `old` to a freshly generated key pair, producing a proof signed
/// by both the old and new secret keys, and the new [`AgentIdentity`].
pub fn rotate_key(old: &AgentIdentity) -> (AgentIdentity, KeyRotationProof) {
    let new_signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    let new_identity =
        AgentIdentity::from_keypair(old.agent_id.clone(), new_signing_key, HashMap::new());

    let body = KeyRotationProofBody {
        old_did: old.did.clone(),
        new_did: new_identity.did.clone(),
        new_public_key: new_identity.public_key,
        timestamp: Utc::now().to_rfc3339(),
    };

    // sign() never fails for well-formed values built from primitive types.
    let old_signature = sign(&body, old).expect("rotation body is canonicalizable");
    let new_signature = sign(&body, &new_identity).expect("rotation body is canonicalizable");

    let proof = KeyRotationProof {
        old_did: body.old_did,
        new_did: body.new_did,
        new_public_key: body.new_public_key,
        timestamp: body.timestamp,
        old_signature,
        new_signature,
    };

    (new_identity, proof)
}

/// Verifies a [`KeyRotationProof`]: both signatures must validate under the
/// public keys their respective DIDs encode.
pub fn verify_key_rotation(proof: &KeyRotationProof) -> bool {
    let (Ok(old_pub), Ok(new_pub)) = (parse_did(&proof.old_did), parse_did(&proof.new_did)) else {
        return false;
    };
    if new_pub != proof.new_public_key {
        return false;
    }

    let body = KeyRotationProofBody::from(proof);
    verify(&body, &proof.old_signature, &old_pub) && verify(&body, &proof.new_signature, &new_pub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_identity() -> AgentIdentity {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        AgentIdentity::from_keypair("test-agent", signing_key, HashMap::new())
    }

    #[test]
    fn valid_rotation_verifies() {
        let old = test_identity();
        let (_new, proof) = rotate_key(&old);
        assert!(verify_key_rotation(&proof));
    }

    #[test]
    fn tampered_new_public_key_fails() {
        let old = test_identity();
        let (_new, mut proof) = rotate_key(&old);
        proof.new_public_key[0] ^= 0xFF;
        assert!(!verify_key_rotation(&proof));
    }

    #[test]
    fn tampered_signature_fails() {
        let old = test_identity();
        let (_new, mut proof) = rotate_key(&old);
        proof.old_signature = proof.new_signature.clone();
        assert!(!verify_key_rotation(&proof));
    }
}
