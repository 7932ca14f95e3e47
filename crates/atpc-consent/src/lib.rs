//! # Consent & Policy Subsystem (C5)
//!
//! Scoped, time-boxed, call-limited consent tokens and the policy engine
//! that evaluates proposed tool actions against them.

pub mod domain;

pub use domain::entities::{ConsentToken, ConsentTokenBody, PolicyDecision, ProposedAction, RiskLevel};
pub use domain::errors::{ConsentError, PolicyError};
pub use domain::policy::PolicyEngine;
pub use domain::scope::{any_scope_authorizes, scope_authorizes};
pub use domain::token::{mint, verify, MintOptions};
