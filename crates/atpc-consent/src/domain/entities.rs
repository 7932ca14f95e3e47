//! # Consent & Policy Entities

use serde::{Deserialize, Serialize};

/// Ordered risk levels; higher variants compare greater (§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn level(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }
}

/// A scoped, time-boxed, call-limited grant minted by an issuer for a
/// subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentToken {
    pub iss: String,
    pub sub: String,
    pub scopes: Vec<String>,
    #[serde(rename = "maxCalls")]
    pub max_calls: u32,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "riskCeiling")]
    pub risk_ceiling: RiskLevel,
    pub nonce: String,
    pub signature: String,
}

/// The subset of [`ConsentToken`] that is actually signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentTokenBody {
    pub iss: String,
    pub sub: String,
    pub scopes: Vec<String>,
    #[serde(rename = "maxCalls")]
    pub max_calls: u32,
    pub iat: i64,
    pub exp: i64,
    #[serde(rename = "riskCeiling")]
    pub risk_ceiling: RiskLevel,
    pub nonce: String,
}

impl From<&ConsentToken> for ConsentTokenBody {
    fn from(t: &ConsentToken) -> Self {
        Self {
            iss: t.iss.clone(),
            sub: t.sub.clone(),
            scopes: t.scopes.clone(),
            max_calls: t.max_calls,
            iat: t.iat,
            exp: t.exp,
            risk_ceiling: t.risk_ceiling,
            nonce: t.nonce.clone(),
        }
    }
}

/// An action a caller proposes to take through the tool gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedAction {
    pub tool: String,
    pub method: String,
    #[serde(rename = "dataScope")]
    pub data_scope: String,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    NeedsConfirm,
    Deny(String),
}
