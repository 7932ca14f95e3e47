//! # Canonical Hashing
//!
//! `SHA256(canonical(value))`, hex-encoded — the same sort-keys rule used
//! throughout the workspace for signing and content-addressing.

use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn hash_canonical<T: Serialize>(value: &T) -> String {
    let bytes = atpc_identity::canonicalize(value).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    hex::encode(digest)
}
