//! # Key Generation
//!
//! Raw Ed25519 key pair generation, separate from [`AgentIdentity`]
//! construction so callers that only need key material (e.g. tests,
//! key-rotation helpers) don't have to stand up a full identity.

use ed25519_dalek::SigningKey;

use super::entities::{PublicKeyBytes, SecretKeyBytes};

/// Generates a fresh Ed25519 key pair.
///
/// Returns `(public_key, secret_key)`, where `secret_key` is the 32-byte
/// signing seed.
pub fn generate_keypair() -> (PublicKeyBytes, SecretKeyBytes) {
    let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
    (signing_key.verifying_key().to_bytes(), signing_key.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_32_bytes() {
        let (pub_key, sec_key) = generate_keypair();
        assert_eq!(pub_key.len(), 32);
        assert_eq!(sec_key.len(), 32);
    }

    #[test]
    fn successive_keypairs_differ() {
        let (pub_a, _) = generate_keypair();
        let (pub_b, _) = generate_keypair();
        assert_ne!(pub_a, pub_b);
    }
}
