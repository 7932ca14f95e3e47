//! # Trust Entities

use atpc_consent::RiskLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed (or failed) execution, submitted by an executor for its
/// own reputation accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub executor: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
    #[serde(rename = "taskType")]
    pub task_type: String,
    #[serde(rename = "riskLevel")]
    pub risk_level: RiskLevel,
    pub success: bool,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "toolCalls")]
    pub tool_calls: u32,
    #[serde(rename = "policyViolations")]
    pub policy_violations: u32,
    #[serde(rename = "proofId")]
    pub proof_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A machine-checkable signal raised by [`super::score::score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskFlag {
    LowSuccessRate,
    HasViolations,
    LowRiskOnly,
    RecentFailures,
}

/// The 0-100 reputation score plus the flags that contributed to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub executor: String,
    pub score: f64,
    pub flags: Vec<RiskFlag>,
    #[serde(rename = "totalTasks")]
    pub total_tasks: u32,
    #[serde(rename = "successRate")]
    pub success_rate: f64,
}

/// One interaction recorded against the trust graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub from: String,
    pub to: String,
    pub scene: String,
    pub success: bool,
    #[serde(rename = "taskWeight")]
    pub task_weight: f64,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// The inputs to [`super::graph::task_weight`].
#[derive(Debug, Clone, Copy)]
pub struct TaskWeightInputs {
    pub tool_calls: u32,
    pub duration_ms: u64,
    pub max_cost: f64,
    pub risk: RiskLevel,
    pub similar_task_count: u32,
}

/// The unique accumulator for one `(from, to, scene)` edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub scene: String,
    pub total_tasks: u32,
    pub successful_tasks: u32,
    pub failed_tasks: u32,
    pub successful_weight: f64,
    pub total_weight: f64,
    pub avg_duration_ms: f64,
    pub consistency: f64,
    pub last_interaction: DateTime<Utc>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, scene: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            scene: scene.into(),
            total_tasks: 0,
            successful_tasks: 0,
            failed_tasks: 0,
            successful_weight: 0.0,
            total_weight: 0.0,
            avg_duration_ms: 0.0,
            consistency: 1.0,
            last_interaction: now,
        }
    }

    pub fn current_success_rate(&self) -> f64 {
        if self.total_weight <= 0.0 {
            0.0
        } else {
            self.successful_weight / self.total_weight
        }
    }
}

/// Result of [`super::graph::TrustGraph::direct_trust`] and
/// [`super::graph::TrustGraph::indirect_trust`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrustResult {
    #[serde(rename = "trustScore")]
    pub trust_score: f64,
    pub confidence: f64,
}

/// Result of [`super::graph::TrustGraph::composite_trust`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeTrust {
    #[serde(rename = "trustScore")]
    pub trust_score: f64,
    pub direct: TrustResult,
    pub indirect: TrustResult,
    #[serde(rename = "reputationBonus")]
    pub reputation_bonus: f64,
}

/// Output of [`super::cluster::detect_suspicious_clusters`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousCluster {
    pub members: Vec<String>,
    #[serde(rename = "internalRatio")]
    pub internal_ratio: f64,
}
