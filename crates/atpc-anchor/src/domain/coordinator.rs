//! # Anchor Coordinator
//!
//! Fans an `anchor` call across every registered provider and aggregates
//! per-chain failures, never failing the host operation: anchoring is
//! advisory timestamping, not part of the trust-critical path.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::entities::{AnchorAllReport, AnchorRecord, VerifyResult};
use super::errors::AnchorError;
use crate::ports::outbound::AnchorProvider;

pub struct AnchorCoordinator {
    providers: RwLock<HashMap<String, Arc<dyn AnchorProvider>>>,
}

impl Default for AnchorCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorCoordinator {
    pub fn new() -> Self {
        Self { providers: RwLock::new(HashMap::new()) }
    }

    pub fn register(&self, chain: impl Into<String>, provider: Arc<dyn AnchorProvider>) {
        self.providers.write().insert(chain.into(), provider);
    }

    pub fn chains(&self) -> Vec<String> {
        self.providers.read().keys().cloned().collect()
    }

    /// Anchors `hash` with every registered provider, aggregating failures
    /// per chain rather than short-circuiting on the first error.
    pub async fn anchor_all(&self, hash: &str, metadata: Option<Value>) -> AnchorAllReport {
        let providers: Vec<(String, Arc<dyn AnchorProvider>)> =
            self.providers.read().iter().map(|(chain, p)| (chain.clone(), p.clone())).collect();

        let mut report = AnchorAllReport::default();
        for (chain, provider) in providers {
            match provider.anchor(hash, metadata.clone()).await {
                Ok(record) => report.succeeded.push(record),
                Err(err) => {
                    tracing::warn!(%chain, %hash, error = %err, "anchor provider failed");
                    report.failed.insert(chain, err.to_string());
                }
            }
        }
        report
    }

    pub async fn verify(&self, chain: &str, hash: &str, tx_hash: &str) -> Result<VerifyResult, AnchorError> {
        let provider = self
            .providers
            .read()
            .get(chain)
            .cloned()
            .ok_or_else(|| AnchorError::UnknownChain(chain.to_string()))?;
        provider.verify(hash, tx_hash).await
    }

    pub async fn lookup_all(&self, hash: &str) -> HashMap<String, Vec<AnchorRecord>> {
        let providers: Vec<(String, Arc<dyn AnchorProvider>)> =
            self.providers.read().iter().map(|(chain, p)| (chain.clone(), p.clone())).collect();

        let mut results = HashMap::new();
        for (chain, provider) in providers {
            let records = provider.lookup(hash).await;
            if !records.is_empty() {
                results.insert(chain, records);
            }
        }
        results
    }
}
