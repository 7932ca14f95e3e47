//! # Session Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroizing;

/// Tag value for the encrypted-payload wire format.
pub const ENC_TAG: &str = "atel.enc.v1";

/// Default session time-to-live (§4.4): one hour.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// A payload encrypted under a session's shared key, as it appears on the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub enc: String,
    pub ciphertext: String,
    pub nonce: String,
    #[serde(rename = "ephemeralPubKey", skip_serializing_if = "Option::is_none")]
    pub ephemeral_pub_key: Option<String>,
}

/// An established, authenticated encrypted session with a remote DID.
pub struct Session {
    pub remote_did: String,
    pub local_secret: StaticSecret,
    pub local_public: PublicKey,
    pub remote_public: PublicKey,
    shared_key: Zeroizing<[u8; 32]>,
    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub rotation_count: u32,
}

impl Session {
    pub fn new(
        remote_did: impl Into<String>,
        local_secret: StaticSecret,
        remote_public: PublicKey,
        shared_key: [u8; 32],
        encrypted: bool,
        ttl_secs: i64,
    ) -> Self {
        let local_public = PublicKey::from(&local_secret);
        let now = Utc::now();
        Self {
            remote_did: remote_did.into(),
            local_secret,
            local_public,
            remote_public,
            shared_key: Zeroizing::new(shared_key),
            encrypted,
            created_at: now,
            expires_at: now + chrono::Duration::seconds(ttl_secs),
            rotation_count: 0,
        }
    }

    pub fn shared_key(&self) -> &[u8; 32] {
        &self.shared_key
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub(crate) fn set_shared_key(&mut self, key: [u8; 32]) {
        self.shared_key = Zeroizing::new(key);
    }
}
