//! # Consent & Policy Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsentError {
    #[error("scopes must not be empty")]
    EmptyScopes,

    #[error("maxCalls must be at least 1")]
    InvalidMaxCalls,

    #[error("consent token signature did not validate")]
    InvalidSignature,

    #[error("consent token expired at {0}")]
    Expired(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no calls remaining on this consent token")]
    CallsExhausted,
}
