//! # Gateway Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("no handler registered for tool {0}")]
    ToolNotFound(String),

    #[error("tool {tool} already registered")]
    DuplicateRegistration { tool: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("confirmation required: {0}")]
    ConfirmationRequired(String),
}
