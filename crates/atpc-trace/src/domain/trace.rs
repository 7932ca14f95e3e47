//! # Execution Trace
//!
//! An append-only, hash-chained log owned exclusively by the task that
//! opened it. Every `DEFAULT_CHECKPOINT_INTERVAL` events, a signed
//! `CHECKPOINT` is auto-inserted committing to every event hash seen so
//! far via a Merkle root.

use atpc_identity::{sign, verify as verify_signature, AgentIdentity};
use chrono::Utc;
use serde_json::Value;

use super::entities::{
    CheckpointData, Event, TraceState, VerificationReport, DEFAULT_CHECKPOINT_INTERVAL,
    EVENT_CHECKPOINT, EVENT_TASK_FAILED, EVENT_TASK_RESULT, GENESIS_PREV,
};
use super::errors::TraceError;
use super::hashing::{event_hash, hash_data, merkle_root};

pub struct Trace {
    events: Vec<Event>,
    state: TraceState,
    checkpoint_interval: u64,
    events_since_checkpoint: u64,
    tool_call_count: u64,
    identity_public_key: [u8; 32],
}

impl Trace {
    pub fn new(identity_public_key: [u8; 32]) -> Self {
        Self::with_checkpoint_interval(identity_public_key, DEFAULT_CHECKPOINT_INTERVAL)
    }

    pub fn with_checkpoint_interval(identity_public_key: [u8; 32], checkpoint_interval: u64) -> Self {
        Self {
            events: Vec::new(),
            state: TraceState::Open,
            checkpoint_interval,
            events_since_checkpoint: 0,
            tool_call_count: 0,
            identity_public_key,
        }
    }

    pub fn state(&self) -> TraceState {
        self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> u64 {
        self.events.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn last_hash(&self) -> Option<&str> {
        self.events.last().map(|e| e.hash.as_str())
    }

    /// Appends a new event, auto-inserting a signed `CHECKPOINT` first if
    /// the checkpoint interval has been reached.
    pub fn append(&mut self, event_type: &str, data: Value, identity: &AgentIdentity) -> Result<&Event, TraceError> {
        self.guard_open()?;

        if event_type == super::entities::EVENT_TOOL_CALL {
            self.tool_call_count += 1;
        }

        self.push_event(event_type, data)?;
        self.events_since_checkpoint += 1;

        if self.events_since_checkpoint >= self.checkpoint_interval {
            self.insert_checkpoint(identity)?;
        }

        Ok(self.events.last().unwrap())
    }

    fn push_event(&mut self, event_type: &str, data: Value) -> Result<(), TraceError> {
        let seq = self.events.len() as u64;
        let ts = Utc::now();
        let ts_str = ts.to_rfc3339();
        let prev = self.last_hash().map(str::to_string);
        let hash = event_hash(seq, &ts_str, event_type, &data, prev.as_deref());
        self.events.push(Event { seq, ts, event_type: event_type.to_string(), data, hash, sig: None });
        Ok(())
    }

    fn insert_checkpoint(&mut self, identity: &AgentIdentity) -> Result<(), TraceError> {
        let merkle_root = merkle_root(&self.events.iter().map(|e| e.hash.clone()).collect::<Vec<_>>());
        let checkpoint_data = CheckpointData {
            merkle_root,
            event_count: self.events.len() as u64,
            tool_calls: self.tool_call_count,
            last_hash: self.last_hash().unwrap_or(GENESIS_PREV).to_string(),
        };
        let data = serde_json::to_value(&checkpoint_data).map_err(|e| TraceError::Canonicalization(e.to_string()))?;
        self.push_event(EVENT_CHECKPOINT, data)?;

        let event = self.events.last_mut().unwrap();
        let signature = sign(&event.hash, identity).map_err(|e| TraceError::SigningFailed(e.to_string()))?;
        event.sig = Some(signature);

        self.events_since_checkpoint = 0;
        tracing::debug!(event_count = self.events.len(), tool_calls = self.tool_call_count, "checkpoint inserted");
        Ok(())
    }

    /// Appends `TASK_RESULT` and marks the trace finalized. No further
    /// appends are permitted afterward.
    pub fn finalize(&mut self, result: Value) -> Result<(), TraceError> {
        self.guard_open()?;
        self.push_event(EVENT_TASK_RESULT, result)?;
        self.state = TraceState::Finalized;
        Ok(())
    }

    /// Appends `TASK_FAILED` and marks the trace failed. No further appends
    /// are permitted afterward.
    pub fn fail(&mut self, error: Value) -> Result<(), TraceError> {
        self.guard_open()?;
        self.push_event(EVENT_TASK_FAILED, error)?;
        self.state = TraceState::Failed;
        Ok(())
    }

    fn guard_open(&self) -> Result<(), TraceError> {
        match self.state {
            TraceState::Open => Ok(()),
            TraceState::Finalized => Err(TraceError::AlreadyFinalized),
            TraceState::Failed => Err(TraceError::AlreadyFailed),
        }
    }

    /// Replays every event, recomputing expected `prev`/`hash`, and
    /// validates checkpoint signatures under the trace owner's public key.
    pub fn verify(&self) -> VerificationReport {
        let mut errors = Vec::new();
        let mut prev: Option<String> = None;

        for (i, event) in self.events.iter().enumerate() {
            if event.seq != i as u64 {
                errors.push(format!("event {i}: expected seq {i}, got {}", event.seq));
            }
            let expected_hash = event_hash(
                event.seq,
                &event.ts.to_rfc3339(),
                &event.event_type,
                &event.data,
                prev.as_deref(),
            );
            if expected_hash != event.hash {
                errors.push(format!("event {i}: hash mismatch"));
            }

            if event.event_type == super::entities::EVENT_CHECKPOINT {
                match &event.sig {
                    Some(sig) => {
                        if !verify_signature(&event.hash, sig, &self.identity_public_key) {
                            errors.push(format!("event {i}: checkpoint signature invalid"));
                        }
                    }
                    None => errors.push(format!("event {i}: checkpoint missing signature")),
                }
            }

            prev = Some(event.hash.clone());
        }

        if errors.is_empty() {
            VerificationReport::ok()
        } else {
            VerificationReport { valid: false, errors }
        }
    }

    pub fn trace_root(&self) -> String {
        merkle_root(&self.events.iter().map(|e| e.hash.clone()).collect::<Vec<_>>())
    }

    pub fn tool_call_count(&self) -> u64 {
        self.tool_call_count
    }

    pub fn identity_public_key(&self) -> &[u8; 32] {
        &self.identity_public_key
    }
}

pub fn canonical_data_hash(data: &Value) -> String {
    hash_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn identity() -> AgentIdentity {
        AgentIdentity::generate("agent-a", HashMap::new())
    }

    #[test]
    fn append_builds_a_hash_chain() {
        let id = identity();
        let mut trace = Trace::new(id.public_key);
        trace.append("TOOL_CALL", serde_json::json!({"tool": "http.get"}), &id).unwrap();
        trace.append("TOOL_RESULT", serde_json::json!({"status": "ok"}), &id).unwrap();
        assert_eq!(trace.len(), 2);
        assert!(trace.verify().valid);
    }

    #[test]
    fn checkpoint_is_auto_inserted_at_interval() {
        let id = identity();
        let mut trace = Trace::with_checkpoint_interval(id.public_key, 3);
        for i in 0..3 {
            trace.append("TOOL_CALL", serde_json::json!({"i": i}), &id).unwrap();
        }
        assert_eq!(trace.len(), 4);
        assert_eq!(trace.events().last().unwrap().event_type, super::super::entities::EVENT_CHECKPOINT);
        assert!(trace.events().last().unwrap().sig.is_some());
    }

    #[test]
    fn finalize_then_append_is_rejected() {
        let id = identity();
        let mut trace = Trace::new(id.public_key);
        trace.finalize(serde_json::json!({"ok": true})).unwrap();
        let result = trace.append("TOOL_CALL", serde_json::json!({}), &id);
        assert!(matches!(result, Err(TraceError::AlreadyFinalized)));
    }

    #[test]
    fn fail_then_finalize_is_rejected() {
        let id = identity();
        let mut trace = Trace::new(id.public_key);
        trace.fail(serde_json::json!({"error": "boom"})).unwrap();
        let result = trace.finalize(serde_json::json!({}));
        assert!(matches!(result, Err(TraceError::AlreadyFailed)));
    }

    #[test]
    fn tampered_event_fails_self_verification() {
        let id = identity();
        let mut trace = Trace::new(id.public_key);
        trace.append("TOOL_CALL", serde_json::json!({"tool": "http.get"}), &id).unwrap();
        trace.events[0].data = serde_json::json!({"tool": "shell.exec"});
        let report = trace.verify();
        assert!(!report.valid);
    }

    #[test]
    fn checkpoint_signature_verifies_individually() {
        let id = identity();
        let mut trace = Trace::with_checkpoint_interval(id.public_key, 1);
        trace.append("TOOL_CALL", serde_json::json!({}), &id).unwrap();
        let checkpoint = trace.events().last().unwrap();
        assert!(verify_signature(&checkpoint.hash, checkpoint.sig.as_ref().unwrap(), &id.public_key));
    }
}
