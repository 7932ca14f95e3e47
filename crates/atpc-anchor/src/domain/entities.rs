//! # Anchor Entities

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An on-chain receipt committing to a hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub hash: String,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
    pub chain: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "blockNumber", skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    pub metadata: HashMap<String, Value>,
}

/// Result of verifying a `(hash, txHash)` pair against a chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub valid: bool,
    pub detail: String,
    #[serde(rename = "blockTimestamp", skip_serializing_if = "Option::is_none")]
    pub block_timestamp: Option<DateTime<Utc>>,
}

/// Per-chain outcome of a fanned-out `anchor_all` call.
#[derive(Debug, Clone)]
pub enum AnchorOutcome {
    Anchored(AnchorRecord),
    Failed(String),
}

/// Aggregated result of [`crate::domain::coordinator::AnchorCoordinator::anchor_all`].
#[derive(Debug, Clone, Default)]
pub struct AnchorAllReport {
    pub succeeded: Vec<AnchorRecord>,
    pub failed: HashMap<String, String>,
}

impl AnchorAllReport {
    pub fn is_fully_successful(&self) -> bool {
        self.failed.is_empty()
    }
}
