//! # In-Memory Reference Provider
//!
//! Simulates an on-chain anchor for local development and tests: every
//! `anchor` call mints a synthetic `txHash` and stores the record so
//! `verify`/`lookup` can answer without an external indexer.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

use super::entities::{AnchorRecord, VerifyResult};
use super::errors::AnchorError;
use crate::ports::outbound::AnchorProvider;

pub struct InMemoryAnchorProvider {
    chain: String,
    records: RwLock<HashMap<String, Vec<AnchorRecord>>>,
    available: RwLock<bool>,
}

impl InMemoryAnchorProvider {
    pub fn new(chain: impl Into<String>) -> Self {
        Self { chain: chain.into(), records: RwLock::new(HashMap::new()), available: RwLock::new(true) }
    }

    /// Test/ops hook to simulate a provider outage.
    pub fn set_available(&self, available: bool) {
        *self.available.write() = available;
    }
}

#[async_trait]
impl AnchorProvider for InMemoryAnchorProvider {
    async fn anchor(&self, hash: &str, metadata: Option<Value>) -> Result<AnchorRecord, AnchorError> {
        if !*self.available.read() {
            return Err(AnchorError::ProviderUnavailable(self.chain.clone()));
        }
        let record = AnchorRecord {
            hash: hash.to_string(),
            tx_hash: format!("0x{}", Uuid::new_v4().simple()),
            chain: self.chain.clone(),
            timestamp: Utc::now(),
            block_number: Some(self.records.read().values().map(Vec::len).sum::<usize>() as u64 + 1),
            metadata: metadata
                .and_then(|v| v.as_object().cloned())
                .map(|m| m.into_iter().collect())
                .unwrap_or_default(),
        };
        self.records.write().entry(hash.to_string()).or_default().push(record.clone());
        Ok(record)
    }

    async fn verify(&self, hash: &str, tx_hash: &str) -> Result<VerifyResult, AnchorError> {
        if !*self.available.read() {
            return Err(AnchorError::ProviderUnavailable(self.chain.clone()));
        }
        let records = self.records.read();
        match records.get(hash).and_then(|rs| rs.iter().find(|r| r.tx_hash == tx_hash)) {
            Some(record) => Ok(VerifyResult { valid: true, detail: "found matching receipt".to_string(), block_timestamp: Some(record.timestamp) }),
            None => Ok(VerifyResult { valid: false, detail: "no matching receipt".to_string(), block_timestamp: None }),
        }
    }

    async fn lookup(&self, hash: &str) -> Vec<AnchorRecord> {
        self.records.read().get(hash).cloned().unwrap_or_default()
    }

    async fn is_available(&self) -> bool {
        *self.available.read()
    }
}
