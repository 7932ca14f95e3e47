//! # Trust Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("execution summary has zero or negative durationMs")]
    InvalidDuration,

    #[error("execution summary is missing an executor DID")]
    MissingExecutor,

    #[error("execution summary is missing a taskId")]
    MissingTaskId,
}
