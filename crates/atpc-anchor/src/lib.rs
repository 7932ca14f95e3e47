//! # Anchor Subsystem (C9)
//!
//! On-chain timestamping provider interface, an in-memory reference
//! implementation, and a coordinator that fans anchoring across every
//! registered chain.

pub mod domain;
pub mod ports;

pub use domain::coordinator::AnchorCoordinator;
pub use domain::entities::{AnchorAllReport, AnchorOutcome, AnchorRecord, VerifyResult};
pub use domain::errors::AnchorError;
pub use domain::memory_provider::InMemoryAnchorProvider;
pub use ports::outbound::AnchorProvider;
