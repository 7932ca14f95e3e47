//! # Trust Graph
//!
//! A directed weighted multi-graph keyed by `(from, to, scene)`. Writes
//! serialize through a single `RwLock`; reads (trust queries, BFS) run
//! concurrently.

use std::collections::{HashMap, HashSet, VecDeque};

use atpc_consent::RiskLevel;
use chrono::Utc;
use parking_lot::RwLock;

use super::entities::{CompositeTrust, Edge, Interaction, TaskWeightInputs, TrustResult};

const MAX_BFS_DEPTH: usize = 3;
const HOP_DECAY: f64 = 0.7;
const ALPHA_DIRECT: f64 = 0.6;
const BETA_INDIRECT: f64 = 0.3;
const BETA_EFF_WHEN_NO_DIRECT: f64 = 0.9;
const GAMMA_REPUTATION: f64 = 0.1;

fn risk_multiplier(risk: RiskLevel) -> f64 {
    match risk {
        RiskLevel::Low => 0.5,
        RiskLevel::Medium => 1.0,
        RiskLevel::High => 2.0,
        RiskLevel::Critical => 3.0,
    }
}

/// `complexity · value · risk · novelty`, per the weighting formula.
pub fn task_weight(inputs: TaskWeightInputs) -> f64 {
    let complexity = (inputs.tool_calls as f64 * 0.2 + inputs.duration_ms as f64 / 10_000.0 * 0.3).min(1.0);
    let value = (inputs.max_cost / 10.0).min(1.0);
    let risk = risk_multiplier(inputs.risk);
    let novelty = 1.0 / (1.0 + (1.0 + inputs.similar_task_count as f64).ln());
    complexity * value * risk * novelty
}

fn edge_key(from: &str, to: &str, scene: &str) -> (String, String, String) {
    (from.to_string(), to.to_string(), scene.to_string())
}

pub struct TrustGraph {
    edges: RwLock<HashMap<(String, String, String), Edge>>,
    outgoing: RwLock<HashMap<String, HashSet<String>>>,
}

impl Default for TrustGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustGraph {
    pub fn new() -> Self {
        Self { edges: RwLock::new(HashMap::new()), outgoing: RwLock::new(HashMap::new()) }
    }

    /// Creates nodes as needed and updates the unique `(from, to, scene)`
    /// edge: counters, weights, running-average duration, and the
    /// consistency EMA.
    pub fn record_interaction(&self, interaction: &Interaction) {
        let key = edge_key(&interaction.from, &interaction.to, &interaction.scene);
        let now = Utc::now();
        let mut edges = self.edges.write();
        let edge = edges
            .entry(key)
            .or_insert_with(|| Edge::new(interaction.from.clone(), interaction.to.clone(), interaction.scene.clone(), now));

        let current_success_rate = edge.current_success_rate();
        let success_value = if interaction.success { 1.0 } else { 0.0 };
        edge.consistency = 0.9 * edge.consistency + 0.1 * (1.0 - (success_value - current_success_rate).abs());

        let prior_total_duration = edge.avg_duration_ms * edge.total_tasks as f64;
        edge.total_tasks += 1;
        edge.avg_duration_ms = (prior_total_duration + interaction.duration_ms as f64) / edge.total_tasks as f64;

        edge.total_weight += interaction.task_weight;
        if interaction.success {
            edge.successful_weight += interaction.task_weight;
            edge.successful_tasks += 1;
        } else {
            edge.failed_tasks += 1;
        }
        edge.last_interaction = now;
        drop(edges);

        self.outgoing.write().entry(interaction.from.clone()).or_default().insert(interaction.to.clone());
    }

    fn edge(&self, from: &str, to: &str, scene: &str) -> Option<Edge> {
        self.edges.read().get(&edge_key(from, to, scene)).cloned()
    }

    /// `swr * recency * consistency * confidence`, or 0 / confidence 0 if
    /// no edge exists yet.
    pub fn direct_trust(&self, from: &str, to: &str, scene: &str) -> TrustResult {
        match self.edge(from, to, scene) {
            Some(edge) if edge.total_weight > 0.0 => {
                let swr = edge.successful_weight / edge.total_weight;
                let days_since = (Utc::now() - edge.last_interaction).num_milliseconds() as f64 / 86_400_000.0;
                let recency = (-0.01 * days_since.max(0.0)).exp();
                let confidence = (edge.total_tasks as f64 / 20.0).min(1.0);
                TrustResult { trust_score: swr * recency * edge.consistency * confidence, confidence }
            }
            _ => TrustResult { trust_score: 0.0, confidence: 0.0 },
        }
    }

    /// BFS up to depth 3 from `from`, respecting `scene`, never revisiting
    /// a node. Returns the maximum path trust across all qualifying paths.
    pub fn indirect_trust(&self, from: &str, to: &str, scene: &str) -> TrustResult {
        let outgoing = self.outgoing.read();
        let mut best = 0.0_f64;
        let mut found = false;

        let mut queue: VecDeque<(String, Vec<String>, f64)> = VecDeque::new();
        queue.push_back((from.to_string(), vec![from.to_string()], 1.0));

        while let Some((current, path, trust_so_far)) = queue.pop_front() {
            if path.len() - 1 >= MAX_BFS_DEPTH {
                continue;
            }
            let Some(neighbors) = outgoing.get(&current) else { continue };
            for next in neighbors {
                if path.contains(next) {
                    continue;
                }
                let direct = self.direct_trust(&current, next, scene);
                if direct.trust_score <= 0.0 {
                    continue;
                }
                let next_trust = trust_so_far * direct.trust_score;
                let mut next_path = path.clone();
                next_path.push(next.clone());
                let hop_count = next_path.len() - 1;

                if next == to && hop_count >= 2 {
                    let path_trust = next_trust * HOP_DECAY.powi((hop_count - 1) as i32);
                    if path_trust > best {
                        best = path_trust;
                    }
                    found = true;
                }

                if hop_count < MAX_BFS_DEPTH {
                    queue.push_back((next.clone(), next_path, next_trust));
                }
            }
        }

        TrustResult { trust_score: best, confidence: if found { 0.5 } else { 0.0 } }
    }

    /// Weighted blend of direct and indirect trust plus a reputation
    /// bonus. When direct trust is 0, α transfers entirely to β.
    pub fn composite_trust(&self, from: &str, to: &str, scene: &str, global_success_rate: f64) -> CompositeTrust {
        let direct = self.direct_trust(from, to, scene);
        let indirect = self.indirect_trust(from, to, scene);
        let reputation_bonus = global_success_rate * 0.5;

        let (alpha, beta) = if direct.trust_score == 0.0 {
            (0.0, BETA_EFF_WHEN_NO_DIRECT)
        } else {
            (ALPHA_DIRECT, BETA_INDIRECT)
        };

        let trust_score = alpha * direct.trust_score + beta * indirect.trust_score + GAMMA_REPUTATION * reputation_bonus;

        CompositeTrust { trust_score, direct, indirect, reputation_bonus }
    }

    /// `1 - (maxRate - minRate)` over an agent's outgoing edges' current
    /// success rates. Flagged suspicious by callers when `< 0.7`.
    pub fn behavior_consistency_score(&self, agent: &str) -> Option<f64> {
        let edges = self.edges.read();
        let rates: Vec<f64> = edges
            .values()
            .filter(|e| e.from == agent)
            .map(Edge::current_success_rate)
            .collect();
        if rates.is_empty() {
            return None;
        }
        let max_rate = rates.iter().cloned().fold(f64::MIN, f64::max);
        let min_rate = rates.iter().cloned().fold(f64::MAX, f64::min);
        Some(1.0 - (max_rate - min_rate))
    }

    pub fn edges_snapshot(&self) -> Vec<Edge> {
        self.edges.read().values().cloned().collect()
    }

    pub fn nodes(&self) -> HashSet<String> {
        let mut nodes = HashSet::new();
        for edge in self.edges.read().values() {
            nodes.insert(edge.from.clone());
            nodes.insert(edge.to.clone());
        }
        nodes
    }
}
