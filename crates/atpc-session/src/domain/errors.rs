//! # Session Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("invalid ciphertext encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("no session found for remote DID {0}")]
    NoSuchSession(String),

    #[error("session expired")]
    Expired,
}
