//! # Orchestrator Entities

use atpc_consent::RiskLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The task payload a delegator places inside a `Task` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskIntent {
    #[serde(rename = "type")]
    pub intent_type: String,
    pub risk: RiskLevel,
    pub scopes: Vec<String>,
    #[serde(rename = "maxCost")]
    pub max_cost: f64,
    #[serde(default)]
    pub params: Value,
}

/// Parameters a delegator supplies beyond the task intent to mint the
/// accompanying consent token.
#[derive(Debug, Clone, Copy)]
pub struct GrantOptions {
    pub max_calls: u32,
    pub ttl_sec: i64,
}

/// What a blocked execution (denied by trust policy before it even starts)
/// reports back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedReport {
    pub status: String,
    pub reason: String,
    pub score: f64,
    #[serde(rename = "requestedRisk")]
    pub requested_risk: RiskLevel,
}

impl BlockedReport {
    pub fn new(reason: impl Into<String>, score: f64, requested_risk: RiskLevel) -> Self {
        Self { status: "blocked".to_string(), reason: reason.into(), score, requested_risk }
    }
}
