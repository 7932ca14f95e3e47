//! # Signing & Verification
//!
//! Detached Ed25519 signatures over canonical JSON.

use base64::{engine::general_purpose::STANDARD, Engine};
use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};
use serde::Serialize;

use super::canonical::canonicalize;
use super::entities::AgentIdentity;
use super::errors::IdentityError;

/// Signs the canonical bytes of `value` with `identity`'s secret key.
///
/// Returns the base64 encoding of the raw 64-byte signature.
pub fn sign<T: Serialize>(value: &T, identity: &AgentIdentity) -> Result<String, IdentityError> {
    let bytes = canonicalize(value)?;
    let sig: Signature = identity.signing_key().sign(&bytes);
    Ok(STANDARD.encode(sig.to_bytes()))
}

/// Verifies `signature` (base64-encoded, 64 bytes) over the canonical bytes
/// of `value` under `public_key`.
pub fn verify<T: Serialize>(value: &T, signature: &str, public_key: &[u8; 32]) -> bool {
    verify_inner(value, signature, public_key).unwrap_or(false)
}

fn verify_inner<T: Serialize>(
    value: &T,
    signature: &str,
    public_key: &[u8; 32],
) -> Result<bool, IdentityError> {
    let bytes = canonicalize(value)?;
    let sig_bytes = STANDARD
        .decode(signature)
        .map_err(|_| IdentityError::InvalidSignature)?;
    let sig_bytes: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| IdentityError::InvalidSignature)?;
    let sig = Signature::from_bytes(&sig_bytes);
    let key = VerifyingKey::from_bytes(public_key).map_err(|_| IdentityError::InvalidSignature)?;
    Ok(key.verify(&bytes, &sig).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use serde_json::json;
    use std::collections::HashMap;

    fn test_identity() -> AgentIdentity {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        AgentIdentity::from_keypair("test-agent", signing_key, HashMap::new())
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let identity = test_identity();
        let value = json!({"hello": "world", "n": 42});
        let sig = sign(&value, &identity).unwrap();
        assert!(verify(&value, &sig, &identity.public_key));
    }

    #[test]
    fn mutated_value_fails_verification() {
        let identity = test_identity();
        let value = json!({"hello": "world"});
        let sig = sign(&value, &identity).unwrap();
        let mutated = json!({"hello": "World"});
        assert!(!verify(&mutated, &sig, &identity.public_key));
    }

    #[test]
    fn mutated_signature_fails_verification() {
        let identity = test_identity();
        let value = json!({"hello": "world"});
        let mut sig = sign(&value, &identity).unwrap();
        sig.pop();
        sig.push(if sig.ends_with('A') { 'B' } else { 'A' });
        assert!(!verify(&value, &sig, &identity.public_key));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let identity = test_identity();
        let other = test_identity();
        let value = json!({"hello": "world"});
        let sig = sign(&value, &identity).unwrap();
        assert!(!verify(&value, &sig, &other.public_key));
    }
}
