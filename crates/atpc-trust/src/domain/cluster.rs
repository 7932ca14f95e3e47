//! # Suspicious Cluster Detection
//!
//! A bounded combinatorial search over the most active agents, flagging
//! subsets whose interactions with each other dominate their interactions
//! with the rest of the graph — a signature of collusive reputation
//! farming.

use std::collections::HashMap;

use super::entities::SuspiciousCluster;
use super::graph::TrustGraph;

const INTERNAL_RATIO_THRESHOLD: f64 = 0.8;
const MIN_CLUSTER_SIZE: usize = 2;

/// Total outgoing + incoming task count per node, used to rank "active".
fn activity(graph: &TrustGraph) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for edge in graph.edges_snapshot() {
        *counts.entry(edge.from.clone()).or_insert(0) += edge.total_tasks;
        *counts.entry(edge.to.clone()).or_insert(0) += edge.total_tasks;
    }
    counts
}

fn subsets(items: &[String], max_size: usize) -> Vec<Vec<String>> {
    let mut result = Vec::new();
    let n = items.len();
    for mask in 1u32..(1u32 << n) {
        let size = mask.count_ones() as usize;
        if size < MIN_CLUSTER_SIZE || size > max_size {
            continue;
        }
        let subset: Vec<String> = (0..n).filter(|i| mask & (1 << i) != 0).map(|i| items[i].clone()).collect();
        result.push(subset);
    }
    result
}

/// Examines every subset (up to `max_cluster_size`) of the `top_n` most
/// active agents and flags those whose internal-to-total task ratio
/// exceeds 80%.
pub fn detect_suspicious_clusters(graph: &TrustGraph, top_n: usize, max_cluster_size: usize) -> Vec<SuspiciousCluster> {
    let activity = activity(graph);
    let mut ranked: Vec<(String, u32)> = activity.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top: Vec<String> = ranked.into_iter().take(top_n).map(|(id, _)| id).collect();

    let edges = graph.edges_snapshot();
    let mut flagged = Vec::new();

    for subset in subsets(&top, max_cluster_size.min(top.len())) {
        let members: std::collections::HashSet<&String> = subset.iter().collect();
        let mut internal = 0u32;
        let mut total = 0u32;
        for edge in &edges {
            let from_in = members.contains(&edge.from);
            let to_in = members.contains(&edge.to);
            if from_in || to_in {
                total += edge.total_tasks;
                if from_in && to_in {
                    internal += edge.total_tasks;
                }
            }
        }
        if total == 0 {
            continue;
        }
        let ratio = internal as f64 / total as f64;
        if ratio > INTERNAL_RATIO_THRESHOLD {
            flagged.push(SuspiciousCluster { members: subset, internal_ratio: ratio });
        }
    }

    flagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Interaction;

    fn interaction(from: &str, to: &str, scene: &str) -> Interaction {
        Interaction { from: from.to_string(), to: to.to_string(), scene: scene.to_string(), success: true, task_weight: 1.0, duration_ms: 10 }
    }

    #[test]
    fn tightly_coupled_pair_is_flagged() {
        let graph = TrustGraph::new();
        for _ in 0..20 {
            graph.record_interaction(&interaction("a", "b", "scene"));
            graph.record_interaction(&interaction("b", "a", "scene"));
        }
        graph.record_interaction(&interaction("a", "outsider", "scene"));

        let clusters = detect_suspicious_clusters(&graph, 5, 3);
        assert!(clusters.iter().any(|c| c.members.contains(&"a".to_string()) && c.members.contains(&"b".to_string())));
    }

    #[test]
    fn evenly_distributed_interactions_are_not_flagged() {
        let graph = TrustGraph::new();
        for target in ["b", "c", "d", "e"] {
            graph.record_interaction(&interaction("a", target, "scene"));
        }
        let clusters = detect_suspicious_clusters(&graph, 5, 2);
        assert!(clusters.is_empty());
    }
}
