//! # Orchestrator Configuration
//!
//! The numeric defaults named throughout the component design, collected
//! into one struct so a host can override them without touching component
//! internals.

/// Tunable defaults for a composed delegate/execute/verify pipeline.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Events between auto-inserted trace checkpoints.
    pub trace_checkpoint_interval: u64,
    /// Default consent token lifetime when a caller doesn't specify one.
    pub default_consent_ttl_sec: i64,
    /// Handshake challenge freshness window.
    pub handshake_challenge_ttl_sec: i64,
    /// Session key lifetime before `SessionStore::rotate` is required.
    pub session_ttl_sec: i64,
    /// How long a seen envelope nonce is remembered for replay rejection.
    pub nonce_tracker_ttl_sec: i64,
    /// Default envelope rate limit, per DID.
    pub rate_limit_per_minute: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            trace_checkpoint_interval: atpc_trace::DEFAULT_CHECKPOINT_INTERVAL,
            default_consent_ttl_sec: 3600,
            handshake_challenge_ttl_sec: 300,
            session_ttl_sec: atpc_session::DEFAULT_SESSION_TTL_SECS as i64,
            nonce_tracker_ttl_sec: 3600,
            rate_limit_per_minute: 100,
        }
    }
}
