//! # Score Client
//!
//! Per-executor reputation, computed on demand from the full submission
//! history rather than maintained incrementally, so the formula can change
//! without a migration.

use std::collections::HashMap;

use atpc_consent::RiskLevel;
use parking_lot::RwLock;

use super::entities::{ExecutionSummary, RiskFlag, ScoreReport};
use super::errors::ValidationError;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}

fn validate(summary: &ExecutionSummary) -> Result<(), ValidationError> {
    if summary.executor.is_empty() {
        return Err(ValidationError::MissingExecutor);
    }
    if summary.task_id.is_empty() {
        return Err(ValidationError::MissingTaskId);
    }
    Ok(())
}

/// Computes the 0-100 score and derived risk flags for one executor's
/// full submission history.
pub fn score(executor: &str, history: &[ExecutionSummary]) -> ScoreReport {
    let total = history.len();
    if total == 0 {
        return ScoreReport {
            executor: executor.to_string(),
            score: 0.0,
            flags: Vec::new(),
            total_tasks: 0,
            success_rate: 0.0,
        };
    }

    let successes = history.iter().filter(|s| s.success).count();
    let success_rate = successes as f64 / total as f64;
    let base = success_rate * 60.0;
    let volume = (total as f64 / 100.0).min(1.0) * 15.0;

    let risk_successes = history
        .iter()
        .filter(|s| s.success && matches!(s.risk_level, RiskLevel::High | RiskLevel::Critical))
        .count();
    let risk_bonus = (risk_successes as f64 / total as f64) * 15.0;

    let total_violations: u32 = history.iter().map(|s| s.policy_violations).sum();
    let consistency = (1.0 - (total_violations as f64 / total as f64).min(1.0)) * 10.0;

    let raw_score = clamp(round2(base + volume + risk_bonus + consistency), 0.0, 100.0);

    let mut flags = Vec::new();
    if success_rate < 0.5 {
        flags.push(RiskFlag::LowSuccessRate);
    }
    if total_violations > 0 {
        flags.push(RiskFlag::HasViolations);
    }
    if total > 50 && history.iter().all(|s| matches!(s.risk_level, RiskLevel::Low)) {
        flags.push(RiskFlag::LowRiskOnly);
    }
    let recent_window = history.iter().rev().take(10);
    let recent: Vec<&ExecutionSummary> = recent_window.collect();
    if !recent.is_empty() {
        let recent_failures = recent.iter().filter(|s| !s.success).count();
        if recent_failures as f64 / recent.len() as f64 > 0.5 {
            flags.push(RiskFlag::RecentFailures);
        }
    }

    ScoreReport {
        executor: executor.to_string(),
        score: raw_score,
        flags,
        total_tasks: total as u32,
        success_rate,
    }
}

/// In-memory, per-executor append-only submission log.
pub struct ScoreStore {
    history: RwLock<HashMap<String, Vec<ExecutionSummary>>>,
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreStore {
    pub fn new() -> Self {
        Self { history: RwLock::new(HashMap::new()) }
    }

    /// Records a new submission. Trust monotonicity is a property of the
    /// score formula given an append-only history, not enforced here.
    pub fn submit(&self, summary: ExecutionSummary) -> Result<(), ValidationError> {
        validate(&summary)?;
        tracing::debug!(executor = %summary.executor, success = summary.success, "execution summary recorded");
        let mut history = self.history.write();
        history.entry(summary.executor.clone()).or_default().push(summary);
        Ok(())
    }

    pub fn score(&self, executor: &str) -> ScoreReport {
        let history = self.history.read();
        match history.get(executor) {
            Some(entries) => score(executor, entries),
            None => score(executor, &[]),
        }
    }

    pub fn history_len(&self, executor: &str) -> usize {
        self.history.read().get(executor).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn summary(executor: &str, success: bool, violations: u32, risk: RiskLevel) -> ExecutionSummary {
        ExecutionSummary {
            executor: executor.to_string(),
            task_id: uuid_like(),
            task_type: "generic".to_string(),
            risk_level: risk,
            success,
            duration_ms: 100,
            tool_calls: 1,
            policy_violations: violations,
            proof_id: "proof-1".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn uuid_like() -> String {
        format!("task-{}", rand_suffix())
    }

    fn rand_suffix() -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().subsec_nanos() as u64
    }

    #[test]
    fn empty_history_scores_zero() {
        let report = score("agent-a", &[]);
        assert_eq!(report.score, 0.0);
        assert!(report.flags.is_empty());
    }

    #[test]
    fn all_success_no_violations_scores_high() {
        let history: Vec<_> = (0..10).map(|_| summary("agent-a", true, 0, RiskLevel::Low)).collect();
        let report = score("agent-a", &history);
        assert!(report.score > 70.0, "{}", report.score);
        assert!(!report.flags.contains(&RiskFlag::HasViolations));
    }

    #[test]
    fn low_success_rate_flag_set() {
        let mut history: Vec<_> = (0..3).map(|_| summary("agent-a", true, 0, RiskLevel::Low)).collect();
        history.extend((0..7).map(|_| summary("agent-a", false, 0, RiskLevel::Low)));
        let report = score("agent-a", &history);
        assert!(report.flags.contains(&RiskFlag::LowSuccessRate));
    }

    #[test]
    fn violations_set_has_violations_flag() {
        let history = vec![summary("agent-a", true, 1, RiskLevel::Low)];
        let report = score("agent-a", &history);
        assert!(report.flags.contains(&RiskFlag::HasViolations));
    }

    #[test]
    fn submitting_through_store_never_loses_history() {
        let store = ScoreStore::new();
        for _ in 0..5 {
            store.submit(summary("agent-b", true, 0, RiskLevel::Medium)).unwrap();
        }
        assert_eq!(store.history_len("agent-b"), 5);
        assert!(store.score("agent-b").score > 0.0);
    }

    #[test]
    fn success_never_decreases_and_failure_never_increases_score() {
        let store = ScoreStore::new();
        for _ in 0..5 {
            store.submit(summary("agent-c", true, 0, RiskLevel::Low)).unwrap();
        }
        let before = store.score("agent-c").score;
        store.submit(summary("agent-c", true, 0, RiskLevel::Low)).unwrap();
        let after_success = store.score("agent-c").score;
        assert!(after_success >= before);

        store.submit(summary("agent-c", false, 0, RiskLevel::Low)).unwrap();
        let after_failure = store.score("agent-c").score;
        assert!(after_failure <= after_success);
    }

    #[test]
    fn missing_executor_is_rejected() {
        let store = ScoreStore::new();
        let mut bad = summary("", true, 0, RiskLevel::Low);
        bad.executor.clear();
        assert_eq!(store.submit(bad), Err(ValidationError::MissingExecutor));
    }
}
