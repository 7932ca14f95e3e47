//! # Identity Subsystem (C1)
//!
//! Ed25519 key material, DID derivation, canonical JSON, and detached
//! signatures. This is the foundation every other Agent Trust Protocol Core
//! crate builds on: canonicalization here is the single place the rest of
//! the workspace gets deterministic bytes to hash or sign.
//!
//! ## Security Notes
//!
//! - `AgentIdentity` zeroes its secret key material on drop.
//! - `canonicalize` does not enable `serde_json`'s `preserve_order` feature
//!   anywhere in this workspace; see [`canonical`] for why that matters.

pub mod domain;

pub use domain::canonical::canonicalize;
pub use domain::did::{create_did, parse_did};
pub use domain::entities::{
    AgentIdentity, KeyRotationProof, KeyRotationProofBody, PublicKeyBytes, SecretKeyBytes,
    DID_LEGACY_PREFIX, DID_PREFIX,
};
pub use domain::errors::IdentityError;
pub use domain::keys::generate_keypair;
pub use domain::rotation::{rotate_key, verify_key_rotation};
pub use domain::signing::{sign, verify};
