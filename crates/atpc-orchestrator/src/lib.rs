//! # Orchestrator Subsystem (C10)
//!
//! Thin composition wiring tying the rest of the protocol surface
//! together into the delegate/execute/verify workflow: a [`Delegator`]
//! checks the executor's trust score against the task's risk before
//! minting a signed task and consent token, an [`Executor`] runs it
//! through a policy-bound gateway and produces a signed proof bundle
//! whose summary reflects success or failure, and the delegator
//! independently re-verifies that bundle. Trust accounting is fed on a
//! best-effort basis via [`trust_feed::record_execution`], after a
//! successful or failed execution alike.

pub mod domain;

pub use domain::config::OrchestratorConfig;
pub use domain::delegator::Delegator;
pub use domain::entities::{BlockedReport, GrantOptions, TaskIntent};
pub use domain::errors::OrchestratorError;
pub use domain::executor::{ExecutionOutput, Executor};
pub use domain::trust_feed::{record_execution, task_weight_inputs};
