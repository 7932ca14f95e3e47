//! # Inbound Ports (Driving Ports / API)

use async_trait::async_trait;

use crate::domain::entities::{ToolCallRequest, ToolCallResult};
use crate::domain::errors::GatewayError;

/// The single chokepoint through which tools are invoked.
#[async_trait]
pub trait ToolGatewayApi: Send + Sync {
    async fn call_tool(&self, request: ToolCallRequest) -> Result<ToolCallResult, GatewayError>;
}
