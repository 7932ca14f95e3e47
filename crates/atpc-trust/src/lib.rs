//! # Trust Subsystem (C8)
//!
//! Reputation scoring from per-executor execution history, plus a
//! directed weighted multi-graph producing direct, indirect, and
//! composite trust between agents.

pub mod domain;

pub use domain::cluster::detect_suspicious_clusters;
pub use domain::entities::{
    CompositeTrust, Edge, ExecutionSummary, Interaction, RiskFlag, ScoreReport, SuspiciousCluster,
    TaskWeightInputs, TrustResult,
};
pub use domain::errors::ValidationError;
pub use domain::graph::{task_weight, TrustGraph};
pub use domain::score::{score, ScoreStore};
