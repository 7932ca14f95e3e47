//! # Anchor Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnchorError {
    #[error("provider for chain {0:?} is unavailable")]
    ProviderUnavailable(String),

    #[error("no provider registered for chain {0:?}")]
    UnknownChain(String),

    #[error("on-chain verification was inconclusive: {0}")]
    Inconclusive(String),
}
