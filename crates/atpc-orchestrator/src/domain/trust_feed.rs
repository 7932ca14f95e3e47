//! # Trust Feed
//!
//! Wires a completed execution into the trust subsystem. Trust updates
//! are best-effort: a failure to record never unwinds the execution that
//! produced it, it's only logged.

use atpc_trust::{task_weight, ExecutionSummary, Interaction, ScoreStore, TaskWeightInputs, TrustGraph};

/// Derives the inputs `atpc_trust::task_weight` needs from a finished
/// execution. `max_cost` and `similar_task_count` come from the delegator's
/// own bookkeeping (the summary alone doesn't carry them), so the caller
/// supplies them.
pub fn task_weight_inputs(summary: &ExecutionSummary, max_cost: f64, similar_task_count: u32) -> TaskWeightInputs {
    TaskWeightInputs {
        tool_calls: summary.tool_calls,
        duration_ms: summary.duration_ms,
        max_cost,
        risk: summary.risk_level,
        similar_task_count,
    }
}

fn interaction_for(delegator_did: &str, summary: &ExecutionSummary, scene: &str, weight: f64) -> Interaction {
    Interaction {
        from: delegator_did.to_string(),
        to: summary.executor.clone(),
        scene: scene.to_string(),
        success: summary.success,
        task_weight: weight,
        duration_ms: summary.duration_ms,
    }
}

/// Submits the execution's reputation history and trust-graph interaction.
/// Logs and continues past either failure; the caller's result is never
/// affected by bookkeeping trouble downstream.
pub fn record_execution(
    score_store: &ScoreStore,
    graph: &TrustGraph,
    delegator_did: &str,
    scene: &str,
    summary: &ExecutionSummary,
    max_cost: f64,
    similar_task_count: u32,
) {
    if let Err(err) = score_store.submit(summary.clone()) {
        tracing::warn!(error = %err, executor = %summary.executor, "failed to record execution summary for trust scoring");
    }

    let weight = task_weight(task_weight_inputs(summary, max_cost, similar_task_count));
    let interaction = interaction_for(delegator_did, summary, scene, weight);
    graph.record_interaction(&interaction);
}
