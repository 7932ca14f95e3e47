//! # Trace & Proof Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("trace is already finalized")]
    AlreadyFinalized,

    #[error("trace has already failed")]
    AlreadyFailed,

    #[error("failed to canonicalize event data: {0}")]
    Canonicalization(String),

    #[error("failed to sign checkpoint: {0}")]
    SigningFailed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProofError {
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    #[error("bundle signature did not validate")]
    InvalidSignature,

    #[error("executor DID could not be parsed")]
    InvalidExecutor,
}
