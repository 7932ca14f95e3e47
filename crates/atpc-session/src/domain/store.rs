//! # Session Store
//!
//! Owns established [`Session`]s, keyed by remote DID. One session per
//! remote at a time; establishing a new one for the same DID replaces the
//! old.

use std::collections::HashMap;

use parking_lot::RwLock;
use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use super::entities::{Session, DEFAULT_SESSION_TTL_SECS};
use super::errors::SessionError;
use super::kdf::derive_shared_key;

pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self { sessions: RwLock::new(HashMap::new()) }
    }

    /// Generates a fresh local X25519 key pair for use in a handshake.
    pub fn generate_keypair() -> (StaticSecret, PublicKey) {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        (secret, public)
    }

    /// Establishes (or replaces) the session for `remote_did`.
    pub fn establish(
        &self,
        remote_did: impl Into<String>,
        local_secret: StaticSecret,
        remote_public: PublicKey,
        encrypted: bool,
    ) {
        let remote_did = remote_did.into();
        let shared_key = derive_shared_key(&local_secret, &remote_public);
        let session = Session::new(
            remote_did.clone(),
            local_secret,
            remote_public,
            shared_key,
            encrypted,
            DEFAULT_SESSION_TTL_SECS,
        );
        self.sessions.write().insert(remote_did, session);
    }

    pub fn with_session<T>(&self, remote_did: &str, f: impl FnOnce(&Session) -> T) -> Result<T, SessionError> {
        let sessions = self.sessions.read();
        let session = sessions
            .get(remote_did)
            .ok_or_else(|| SessionError::NoSuchSession(remote_did.to_string()))?;
        if session.is_expired() {
            return Err(SessionError::Expired);
        }
        Ok(f(session))
    }

    /// Generates a fresh local key pair, re-derives the shared secret with
    /// `new_remote_public`, zeroes the old key material, and increments the
    /// rotation counter.
    pub fn rotate(&self, remote_did: &str, new_remote_public: PublicKey) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(remote_did)
            .ok_or_else(|| SessionError::NoSuchSession(remote_did.to_string()))?;

        let (new_local_secret, new_local_public) = Self::generate_keypair();
        let new_shared_key = derive_shared_key(&new_local_secret, &new_remote_public);

        session.local_secret = new_local_secret;
        session.local_public = new_local_public;
        session.remote_public = new_remote_public;
        session.set_shared_key(new_shared_key);
        session.rotation_count += 1;
        Ok(())
    }

    /// Explicitly removes and zeroes the session for `remote_did`.
    /// Idempotent: destroying a session that does not exist is not an error.
    pub fn destroy(&self, remote_did: &str) {
        self.sessions.write().remove(remote_did);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
