//! # Gateway Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a completed (or attempted) tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Ok,
    Error,
    Timeout,
}

/// A caller's request to invoke a registered tool.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    pub tool: String,
    pub input: Value,
    pub risk_level: Option<atpc_consent::RiskLevel>,
    pub data_scope: Option<String>,
}

/// The result of a `call_tool` invocation (§4.6 step 9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub output: Value,
    pub status: CallStatus,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "inputHash")]
    pub input_hash: String,
    #[serde(rename = "outputHash")]
    pub output_hash: String,
}

/// An audit record of one tool call, independent of whether a trace is
/// attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLogEntry {
    pub tool: String,
    pub status: CallStatus,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}
