//! # Policy Engine
//!
//! Binds a [`ConsentToken`] to a live remaining-call counter and evaluates
//! proposed tool actions against it.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

use super::entities::{ConsentToken, PolicyDecision, ProposedAction, RiskLevel};
use super::errors::PolicyError;
use super::scope::any_scope_authorizes;

pub struct PolicyEngine {
    token: ConsentToken,
    remaining_calls: AtomicU32,
}

impl PolicyEngine {
    pub fn new(token: ConsentToken) -> Self {
        let remaining = token.max_calls;
        Self { token, remaining_calls: AtomicU32::new(remaining) }
    }

    pub fn token(&self) -> &ConsentToken {
        &self.token
    }

    pub fn get_remaining_calls(&self) -> u32 {
        self.remaining_calls.load(Ordering::SeqCst)
    }

    /// Evaluates `action` requested at `requested_risk` against the bound
    /// token.
    pub fn evaluate(&self, action: &ProposedAction, requested_risk: RiskLevel) -> PolicyDecision {
        if Utc::now().timestamp() >= self.token.exp {
            return PolicyDecision::Deny("token expired".to_string());
        }
        if self.get_remaining_calls() == 0 {
            return PolicyDecision::Deny("no calls remaining".to_string());
        }

        let tool_scope = format!("tool:{}:{}", action.tool, action.method);
        let data_scope = format!("data:{}", action.data_scope);
        if !any_scope_authorizes(&self.token.scopes, &tool_scope)
            || !any_scope_authorizes(&self.token.scopes, &data_scope)
        {
            return PolicyDecision::Deny("requested scope not granted".to_string());
        }

        let requested = requested_risk.level();
        let ceiling = self.token.risk_ceiling.level();
        if requested <= ceiling {
            PolicyDecision::Allow
        } else if requested == ceiling + 1 {
            PolicyDecision::NeedsConfirm
        } else {
            PolicyDecision::Deny("requested risk exceeds ceiling".to_string())
        }
    }

    /// Decrements the remaining-call counter. Refuses to go below zero.
    pub fn record_call(&self) -> Result<(), PolicyError> {
        loop {
            let current = self.remaining_calls.load(Ordering::SeqCst);
            if current == 0 {
                return Err(PolicyError::CallsExhausted);
            }
            if self
                .remaining_calls
                .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{mint, MintOptions};
    use atpc_identity::AgentIdentity;
    use std::collections::HashMap;

    fn token(scopes: Vec<&str>, max_calls: u32, risk_ceiling: RiskLevel) -> ConsentToken {
        let issuer = AgentIdentity::generate("issuer", HashMap::new());
        mint(
            &issuer,
            "subject",
            scopes.into_iter().map(String::from).collect(),
            MintOptions { max_calls, ttl_sec: 3600 },
            risk_ceiling,
        )
        .unwrap()
    }

    fn action(tool: &str, data_scope: &str) -> ProposedAction {
        ProposedAction { tool: tool.to_string(), method: "get".to_string(), data_scope: data_scope.to_string() }
    }

    #[test]
    fn allows_within_scope_and_risk() {
        let t = token(vec!["tool:http:get", "data:public_web:read"], 3, RiskLevel::Medium);
        let engine = PolicyEngine::new(t);
        let decision = engine.evaluate(&action("http:get", "public_web:read"), RiskLevel::Low);
        assert_eq!(decision, PolicyDecision::Allow);
    }

    #[test]
    fn needs_confirm_one_level_above_ceiling() {
        let t = token(vec!["tool:http:get", "data:public_web:read"], 3, RiskLevel::Low);
        let engine = PolicyEngine::new(t);
        let decision = engine.evaluate(&action("http:get", "public_web:read"), RiskLevel::Medium);
        assert_eq!(decision, PolicyDecision::NeedsConfirm);
    }

    #[test]
    fn denies_two_levels_above_ceiling() {
        let t = token(vec!["tool:http:get", "data:public_web:read"], 3, RiskLevel::Low);
        let engine = PolicyEngine::new(t);
        let decision = engine.evaluate(&action("http:get", "public_web:read"), RiskLevel::High);
        assert!(matches!(decision, PolicyDecision::Deny(_)));
    }

    #[test]
    fn denies_unscoped_action() {
        let t = token(vec!["tool:http:get"], 3, RiskLevel::Critical);
        let engine = PolicyEngine::new(t);
        let decision = engine.evaluate(&action("shell:exec", "public_web:read"), RiskLevel::Low);
        assert!(matches!(decision, PolicyDecision::Deny(_)));
    }

    #[test]
    fn record_call_refuses_below_zero() {
        let t = token(vec!["tool:http:get"], 1, RiskLevel::Low);
        let engine = PolicyEngine::new(t);
        assert!(engine.record_call().is_ok());
        assert_eq!(engine.get_remaining_calls(), 0);
        assert!(matches!(engine.record_call(), Err(PolicyError::CallsExhausted)));
    }

    #[test]
    fn exhausted_calls_deny_new_evaluation() {
        let t = token(vec!["tool:http:get", "data:public_web:read"], 1, RiskLevel::Medium);
        let engine = PolicyEngine::new(t);
        engine.record_call().unwrap();
        let decision = engine.evaluate(&action("http:get", "public_web:read"), RiskLevel::Low);
        assert!(matches!(decision, PolicyDecision::Deny(_)));
    }
}
