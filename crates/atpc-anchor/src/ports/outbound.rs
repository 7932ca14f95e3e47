//! # Outbound Ports (Driven Ports / SPI)

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{AnchorRecord, VerifyResult};
use crate::domain::errors::AnchorError;

/// One chain's anchoring backend. Implementations are registered under a
/// chain identifier with [`crate::domain::coordinator::AnchorCoordinator`].
#[async_trait]
pub trait AnchorProvider: Send + Sync {
    async fn anchor(&self, hash: &str, metadata: Option<Value>) -> Result<AnchorRecord, AnchorError>;
    async fn verify(&self, hash: &str, tx_hash: &str) -> Result<VerifyResult, AnchorError>;
    async fn lookup(&self, hash: &str) -> Vec<AnchorRecord>;
    async fn is_available(&self) -> bool;
}
