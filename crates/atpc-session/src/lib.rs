//! # Session Crypto Subsystem (C3)
//!
//! X25519 key agreement, a domain-separated SHA-256 KDF, and NaCl-secretbox
//! authenticated encryption, owned per remote DID by a [`SessionStore`].

pub mod domain;

pub use domain::crypto::{decrypt, encrypt};
pub use domain::entities::{EncryptedPayload, Session, DEFAULT_SESSION_TTL_SECS, ENC_TAG};
pub use domain::errors::SessionError;
pub use domain::kdf::derive_shared_key;
pub use domain::store::SessionStore;
