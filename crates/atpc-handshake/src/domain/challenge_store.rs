//! # Challenge Store
//!
//! Pending challenges this side has issued, keyed by remote DID. A challenge
//! is fresh, random, at least 32 bytes, and consumed (removed) the moment it
//! is successfully verified — a second verification against the same
//! challenge is rejected as a replay.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use parking_lot::Mutex;
use rand::RngCore;

/// Minimum challenge length in bytes (§4.4).
pub const MIN_CHALLENGE_BYTES: usize = 32;

pub struct ChallengeStore {
    pending: Mutex<HashMap<String, String>>,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self { pending: Mutex::new(HashMap::new()) }
    }

    /// Generates a fresh random challenge and records it as pending for
    /// `remote_did`, replacing any prior pending challenge for that peer.
    pub fn issue(&self, remote_did: impl Into<String>) -> String {
        let mut bytes = [0u8; MIN_CHALLENGE_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        let challenge = STANDARD.encode(bytes);
        self.pending.lock().insert(remote_did.into(), challenge.clone());
        challenge
    }

    /// Consumes the pending challenge for `remote_did` if `candidate`
    /// matches it. Returns `true` and removes the entry on a match; returns
    /// `false` (without side effects beyond the lookup) otherwise.
    pub fn consume_if_matches(&self, remote_did: &str, candidate: &str) -> bool {
        let mut pending = self.pending.lock();
        match pending.get(remote_did) {
            Some(stored) if stored == candidate => {
                pending.remove(remote_did);
                true
            }
            _ => false,
        }
    }

    pub fn has_pending(&self, remote_did: &str) -> bool {
        self.pending.lock().contains_key(remote_did)
    }

    /// Returns the pending challenge for `remote_did` without consuming it.
    pub fn peek(&self, remote_did: &str) -> Option<String> {
        self.pending.lock().get(remote_did).cloned()
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}
