//! # DID Grammar
//!
//! `did:atel:ed25519:<base58(publicKey)>`, with `did:atel:<base58(publicKey)>`
//! accepted (never emitted) for backward compatibility.

use super::entities::{PublicKeyBytes, DID_LEGACY_PREFIX, DID_PREFIX};
use super::errors::IdentityError;

/// Derives the current-form DID for a public key. Pure function of `pub`.
pub fn create_did(public_key: &PublicKeyBytes) -> String {
    format!("{DID_PREFIX}{}", bs58::encode(public_key).into_string())
}

/// Parses a DID in either the current or legacy grammar into its public key.
///
/// # Errors
///
/// [`IdentityError::InvalidDid`] if neither prefix matches;
/// [`IdentityError::InvalidDidEncoding`] if the key segment is not valid
/// base58; [`IdentityError::InvalidKeyLength`] if the decoded key is not
/// exactly 32 bytes.
pub fn parse_did(did: &str) -> Result<PublicKeyBytes, IdentityError> {
    let encoded = if let Some(rest) = did.strip_prefix(DID_PREFIX) {
        rest
    } else if let Some(rest) = did.strip_prefix(DID_LEGACY_PREFIX) {
        rest
    } else {
        return Err(IdentityError::InvalidDid(did.to_string()));
    };

    let decoded = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| IdentityError::InvalidDidEncoding(e.to_string()))?;

    let len = decoded.len();
    decoded.try_into().map_err(|_| IdentityError::InvalidKeyLength {
        expected: 32,
        actual: len,
    })
}
