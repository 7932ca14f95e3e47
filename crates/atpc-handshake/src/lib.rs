//! # Handshake Subsystem (C4)
//!
//! The three-message mutual challenge-response exchange that authenticates
//! two DIDs to each other and derives the [`atpc_session::Session`] they'll
//! use afterward.

pub mod domain;

pub use domain::challenge_store::{ChallengeStore, MIN_CHALLENGE_BYTES};
pub use domain::entities::{
    HandshakeAck, HandshakeConfirm, HandshakeInit, InitiatorState, ResponderState, WalletBundle,
    WalletBundleBody, WalletVerification,
};
pub use domain::errors::HandshakeError;
pub use domain::state_machine::{build_ack, build_confirm, build_init, process_ack, process_confirm, process_init};
pub use domain::wallet::{sign_wallet_bundle, verify_wallet_bundle};
