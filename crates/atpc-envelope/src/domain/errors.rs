//! # Envelope Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown envelope message type: {0}")]
    UnknownType(String),

    #[error("timestamp {timestamp} is outside the allowed window (max age {max_age_ms}ms)")]
    TimestampOutOfWindow { timestamp: String, max_age_ms: i64 },

    #[error("envelope timestamp {0} is not valid RFC 3339")]
    InvalidTimestamp(String),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("nonce {0} was already seen (replay)")]
    ReplayedNonce(String),

    #[error("rate limit exceeded")]
    RateLimited,
}
