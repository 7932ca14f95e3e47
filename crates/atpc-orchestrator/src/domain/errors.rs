//! # Orchestrator Errors
//!
//! Wraps each component's error kind so a caller at the composition
//! boundary deals with one error type, while each component still owns
//! its precise kind internally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("identity error: {0}")]
    Identity(#[from] atpc_identity::IdentityError),

    #[error("envelope error: {0}")]
    Envelope(#[from] atpc_envelope::EnvelopeError),

    #[error("consent error: {0}")]
    Consent(#[from] atpc_consent::ConsentError),

    #[error("policy error: {0}")]
    Policy(#[from] atpc_consent::PolicyError),

    #[error("gateway error: {0}")]
    Gateway(#[from] atpc_gateway::GatewayError),

    #[error("trace error: {0}")]
    Trace(#[from] atpc_trace::TraceError),

    #[error("validation error: {0}")]
    Validation(#[from] atpc_trust::ValidationError),

    #[error("execution blocked: {reason} (score={score}, requestedRisk={requested_risk:?})")]
    Blocked { reason: String, score: f64, requested_risk: atpc_consent::RiskLevel },
}
