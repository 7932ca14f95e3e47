//! # Handshake Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    #[error("envelope signature did not validate")]
    BadSignature,

    #[error("declared public key does not match the DID")]
    DidPublicKeyMismatch,

    #[error("no pending challenge for remote {0}")]
    UnknownChallenge(String),

    #[error("challenge already consumed (replay)")]
    ReplayedChallenge,

    #[error("challenge response did not validate")]
    ChallengeVerificationFailed,

    #[error("envelope timestamp outside the allowed window")]
    Expired,

    #[error("unexpected message type for the current handshake step")]
    UnexpectedMessage,

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
