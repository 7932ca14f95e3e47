//! # Identity Entities
//!
//! Core data structures for agent identity and key rotation.

use std::collections::HashMap;

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// DID prefix for the current (non-legacy) grammar:
/// `did:atel:ed25519:<base58(publicKey)>`.
pub const DID_PREFIX: &str = "did:atel:ed25519:";

/// DID prefix accepted for backward compatibility only; never emitted.
pub const DID_LEGACY_PREFIX: &str = "did:atel:";

/// A 32-byte Ed25519 public key.
pub type PublicKeyBytes = [u8; 32];

/// A 64-byte Ed25519 secret key (seed + public key, dalek "keypair" bytes
/// are not used on the wire — only the 32-byte seed is ever persisted by a
/// host; this type is the in-memory signing handle).
pub type SecretKeyBytes = [u8; 32];

/// A persistent, long-term agent identity.
///
/// `did` is a pure function of `public_key`; it is computed once at
/// construction and never independently mutated.
pub struct AgentIdentity {
    /// Opaque identifier, unique within a deployment.
    pub agent_id: String,
    /// The agent's Ed25519 public key.
    pub public_key: PublicKeyBytes,
    /// The agent's Ed25519 signing key. Zeroed on drop.
    signing_key: SigningKey,
    /// `did:atel:ed25519:<base58(public_key)>`.
    pub did: String,
    /// Free-form metadata attached at creation time.
    pub metadata: HashMap<String, Value>,
}

impl AgentIdentity {
    /// Generates a fresh key pair and builds an identity from it.
    pub fn generate(agent_id: impl Into<String>, metadata: HashMap<String, Value>) -> Self {
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_keypair(agent_id, signing_key, metadata)
    }

    /// Builds an identity from raw key material, deriving `did`.
    pub fn from_keypair(
        agent_id: impl Into<String>,
        signing_key: SigningKey,
        metadata: HashMap<String, Value>,
    ) -> Self {
        let public_key = signing_key.verifying_key().to_bytes();
        let did = super::did::create_did(&public_key);
        Self {
            agent_id: agent_id.into(),
            public_key,
            signing_key,
            did,
            metadata,
        }
    }

    /// Returns the verifying (public) key handle for signature checks.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Returns the raw 32-byte secret seed. Callers must not persist this
    /// beyond the lifetime of the owning process without their own
    /// encryption-at-rest scheme; this crate makes no guarantee about what
    /// happens to copies taken out of its control.
    pub fn secret_seed(&self) -> SecretKeyBytes {
        self.signing_key.to_bytes()
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Proof that an agent rotated from an old key pair to a new one.
///
/// Signed by both the old and new secret keys so that a verifier holding
/// only the old DID, only the new DID, or both, can each independently
/// confirm continuity of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRotationProof {
    pub old_did: String,
    pub new_did: String,
    pub new_public_key: PublicKeyBytes,
    pub timestamp: String,
    pub old_signature: String,
    pub new_signature: String,
}

/// The subset of `KeyRotationProof` that is signed (i.e. the proof minus
/// the two signature fields), used to reconstruct the signed bytes during
/// verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyRotationProofBody {
    pub old_did: String,
    pub new_did: String,
    pub new_public_key: PublicKeyBytes,
    pub timestamp: String,
}

impl From<&KeyRotationProof> for KeyRotationProofBody {
    fn from(p: &KeyRotationProof) -> Self {
        Self {
            old_did: p.old_did.clone(),
            new_did: p.new_did.clone(),
            new_public_key: p.new_public_key,
            timestamp: p.timestamp.clone(),
        }
    }
}
