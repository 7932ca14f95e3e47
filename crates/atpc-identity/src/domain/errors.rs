//! # Identity Errors
//!
//! Error types for key management, DID parsing, and signature verification.

use thiserror::Error;

/// Errors that can occur while handling agent identities.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A decoded key did not have the expected byte length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// A DID string did not match either the current or legacy grammar.
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    /// Base58 decoding of the DID's key segment failed.
    #[error("invalid DID encoding: {0}")]
    InvalidDidEncoding(String),

    /// A signature failed to verify, or was malformed.
    #[error("signature verification failed")]
    InvalidSignature,

    /// Canonicalization was attempted on a value that cannot be represented
    /// in canonical JSON (e.g. NaN float).
    #[error("value is not canonicalizable: {0}")]
    NotCanonicalizable(String),
}
