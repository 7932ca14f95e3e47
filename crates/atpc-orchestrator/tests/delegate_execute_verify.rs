use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use atpc_consent::{mint, MintOptions, RiskLevel};
use atpc_gateway::{GatewayError, ToolCallRequest, ToolGatewayApi, ToolHandler};
use atpc_identity::AgentIdentity;
use atpc_orchestrator::{Delegator, Executor, GrantOptions, OrchestratorConfig, OrchestratorError, TaskIntent};
use atpc_trust::ScoreStore;
use serde_json::json;

struct EchoSearch;

#[async_trait]
impl ToolHandler for EchoSearch {
    async fn call(&self, _input: serde_json::Value) -> Result<serde_json::Value, String> {
        Ok(json!({"results": [{"title": "X", "url": "https://x"}]}))
    }
}

fn web_search_intent() -> TaskIntent {
    TaskIntent {
        intent_type: "web_search".to_string(),
        risk: RiskLevel::Low,
        scopes: vec!["tool:http:get".to_string(), "data:public_web:read".to_string()],
        max_cost: 0.01,
        params: json!({"query": "rust idioms"}),
    }
}

#[tokio::test]
async fn happy_path_delegate_execute_verify() {
    let delegator_identity = AgentIdentity::generate("delegator", HashMap::new());
    let delegator_did = delegator_identity.did.clone();
    let delegator = Delegator::new(delegator_identity);

    let executor_identity = AgentIdentity::generate("executor", HashMap::new());
    let executor_did = executor_identity.did.clone();
    let executor = Executor::new(executor_identity, OrchestratorConfig::default());

    let intent = web_search_intent();
    let trust = ScoreStore::new();
    let (envelope, consent) = delegator
        .delegate(executor_did.clone(), &intent, GrantOptions { max_calls: 5, ttl_sec: 3600 }, &trust)
        .unwrap();
    assert_eq!(envelope.from, delegator_did);

    let output = executor
        .execute(
            &envelope,
            "task-1",
            "web_search",
            &consent,
            |gateway| gateway.register("http.get", Arc::new(EchoSearch)),
            |gateway| async move {
                gateway
                    .call_tool(ToolCallRequest {
                        tool: "http.get".to_string(),
                        input: json!({"query": "rust idioms"}),
                        risk_level: Some(RiskLevel::Low),
                        data_scope: Some("public_web:read".to_string()),
                    })
                    .await
                    .map(|result| result.output)
                    .map_err(|e| e.to_string())
            },
        )
        .await
        .unwrap();

    assert!(output.summary.success);
    assert!(output.bundle.trace_length >= 4);

    let report = delegator.verify_execution(&output.bundle, &output.trace);
    assert!(report.valid);
}

#[tokio::test]
async fn unauthorized_tool_is_rejected_before_handler_runs() {
    let delegator_identity = AgentIdentity::generate("delegator", HashMap::new());
    let delegator = Delegator::new(delegator_identity);

    let executor_identity = AgentIdentity::generate("executor", HashMap::new());
    let executor_did = executor_identity.did.clone();
    let executor = Executor::new(executor_identity, OrchestratorConfig::default());

    let intent = web_search_intent();
    let trust = ScoreStore::new();
    let (envelope, consent) = delegator
        .delegate(executor_did, &intent, GrantOptions { max_calls: 5, ttl_sec: 3600 }, &trust)
        .unwrap();

    // Directly against the gateway: the standalone claim from the scenario
    // this covers — denied before the handler runs, call log stays empty.
    let standalone_policy = Arc::new(atpc_consent::PolicyEngine::new(consent.clone()));
    let standalone_gateway = atpc_gateway::ToolGateway::new(standalone_policy, None);
    standalone_gateway.register("db.write", Arc::new(EchoSearch)).unwrap();
    let direct_result = standalone_gateway
        .call_tool(ToolCallRequest {
            tool: "db.write".to_string(),
            input: json!({}),
            risk_level: Some(RiskLevel::Low),
            data_scope: Some("public_web:read".to_string()),
        })
        .await;
    assert!(matches!(direct_result, Err(GatewayError::Unauthorized(_))));
    assert!(standalone_gateway.call_log().is_empty());

    let output = executor
        .execute(
            &envelope,
            "task-2",
            "web_search",
            &consent,
            |gateway| gateway.register("db.write", Arc::new(EchoSearch)),
            |gateway| async move {
                gateway
                    .call_tool(ToolCallRequest {
                        tool: "db.write".to_string(),
                        input: json!({}),
                        risk_level: Some(RiskLevel::Low),
                        data_scope: Some("public_web:read".to_string()),
                    })
                    .await
                    .map(|result| result.output)
                    .map_err(|e| e.to_string())
            },
        )
        .await
        .unwrap();

    assert!(!output.summary.success);
}

#[tokio::test]
async fn expired_consent_is_rejected_by_both_policy_and_verify() {
    let issuer = AgentIdentity::generate("delegator", HashMap::new());
    let token = mint(
        &issuer,
        "subject-executor",
        vec!["tool:http:get".to_string(), "data:public_web:read".to_string()],
        MintOptions { max_calls: 3, ttl_sec: -1 },
        RiskLevel::Low,
    )
    .unwrap();

    assert!(atpc_consent::verify(&token, &issuer.public_key).is_err());

    let policy = atpc_consent::PolicyEngine::new(token);
    let decision = policy.evaluate(
        &atpc_consent::ProposedAction {
            tool: "http".to_string(),
            method: "get".to_string(),
            data_scope: "public_web:read".to_string(),
        },
        RiskLevel::Low,
    );
    assert!(matches!(decision, atpc_consent::PolicyDecision::Deny(_)));
}

#[tokio::test]
async fn quota_is_exhausted_after_max_calls() {
    let delegator_identity = AgentIdentity::generate("delegator", HashMap::new());
    let delegator = Delegator::new(delegator_identity);

    let executor_identity = AgentIdentity::generate("executor", HashMap::new());
    let executor_did = executor_identity.did.clone();

    let intent = web_search_intent();
    let trust = ScoreStore::new();
    let (_envelope, consent) = delegator
        .delegate(executor_did, &intent, GrantOptions { max_calls: 3, ttl_sec: 3600 }, &trust)
        .unwrap();

    let policy = atpc_consent::PolicyEngine::new(consent);
    let action = atpc_consent::ProposedAction {
        tool: "http".to_string(),
        method: "get".to_string(),
        data_scope: "public_web:read".to_string(),
    };

    for _ in 0..3 {
        assert_eq!(policy.evaluate(&action, RiskLevel::Low), atpc_consent::PolicyDecision::Allow);
        policy.record_call().unwrap();
    }
    assert_eq!(policy.get_remaining_calls(), 0);
    assert!(matches!(policy.evaluate(&action, RiskLevel::Low), atpc_consent::PolicyDecision::Deny(_)));
}

#[tokio::test]
async fn tampered_trace_root_fails_verification() {
    let delegator_identity = AgentIdentity::generate("delegator", HashMap::new());
    let delegator = Delegator::new(delegator_identity);

    let executor_identity = AgentIdentity::generate("executor", HashMap::new());
    let executor_did = executor_identity.did.clone();
    let executor = Executor::new(executor_identity, OrchestratorConfig::default());

    let intent = web_search_intent();
    let trust = ScoreStore::new();
    let (envelope, consent) = delegator
        .delegate(executor_did, &intent, GrantOptions { max_calls: 5, ttl_sec: 3600 }, &trust)
        .unwrap();

    let mut output = executor
        .execute(
            &envelope,
            "task-5",
            "web_search",
            &consent,
            |gateway| gateway.register("http.get", Arc::new(EchoSearch)),
            |gateway| async move {
                gateway
                    .call_tool(ToolCallRequest {
                        tool: "http.get".to_string(),
                        input: json!({"query": "rust idioms"}),
                        risk_level: Some(RiskLevel::Low),
                        data_scope: Some("public_web:read".to_string()),
                    })
                    .await
                    .map(|result| result.output)
                    .map_err(|e| e.to_string())
            },
        )
        .await
        .unwrap();

    let mut chars: Vec<char> = output.bundle.trace_root.chars().collect();
    let idx = chars.len() / 2;
    chars[idx] = if chars[idx] == '0' { '1' } else { '0' };
    output.bundle.trace_root = chars.into_iter().collect();

    let report = delegator.verify_execution(&output.bundle, &output.trace);
    assert!(!report.valid);
    assert!(report.checks.iter().any(|c| c.name == "merkle-root" && !c.passed));
}

#[tokio::test]
async fn delegation_is_blocked_for_an_executor_with_a_poor_track_record() {
    let delegator_identity = AgentIdentity::generate("delegator", HashMap::new());
    let delegator = Delegator::new(delegator_identity);

    let executor_identity = AgentIdentity::generate("executor", HashMap::new());
    let executor_did = executor_identity.did.clone();

    let trust = ScoreStore::new();
    for _ in 0..10 {
        trust
            .submit(atpc_trust::ExecutionSummary {
                executor: executor_did.clone(),
                task_id: "past-task".to_string(),
                task_type: "web_search".to_string(),
                risk_level: RiskLevel::Low,
                success: false,
                duration_ms: 10,
                tool_calls: 1,
                policy_violations: 0,
                proof_id: "proof".to_string(),
                timestamp: chrono::Utc::now(),
            })
            .unwrap();
    }

    let mut high_risk_intent = web_search_intent();
    high_risk_intent.risk = RiskLevel::High;

    let result = delegator.delegate(
        executor_did,
        &high_risk_intent,
        GrantOptions { max_calls: 5, ttl_sec: 3600 },
        &trust,
    );

    assert!(matches!(result, Err(OrchestratorError::Blocked { .. })));
}
