//! # Session Key Derivation
//!
//! `shared = SHA256("atel-session-key-v1" || X25519(localSecret, remotePublic))`.
//! The domain-separation prefix is mandatory: it stops the raw X25519 output
//! from being usable as a key for anything else that might derive from the
//! same shared secret.

use sha2::{Digest, Sha256};
use x25519_dalek::{PublicKey, StaticSecret};

const DOMAIN_PREFIX: &[u8] = b"atel-session-key-v1";

/// Derives the 32-byte session key from a local secret and a remote public
/// key via X25519 Diffie-Hellman plus a domain-separated SHA-256 hash.
pub fn derive_shared_key(local_secret: &StaticSecret, remote_public: &PublicKey) -> [u8; 32] {
    let dh = local_secret.diffie_hellman(remote_public);
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_PREFIX);
    hasher.update(dh.as_bytes());
    hasher.finalize().into()
}
