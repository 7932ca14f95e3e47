//! # Handshake Entities

use serde::{Deserialize, Serialize};

/// `A -> B`: the first handshake message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeInit {
    pub did_a: String,
    pub pub_a: String,
    pub enc_pub_a: String,
    pub challenge_a: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallets: Option<WalletBundle>,
}

/// `B -> A`: the second handshake message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeAck {
    pub did_b: String,
    pub pub_b: String,
    pub enc_pub_b: String,
    pub challenge_b: String,
    pub sign_b_challenge_a: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallets: Option<WalletBundle>,
}

/// `A -> B`: the third and final handshake message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfirm {
    pub sign_a_challenge_b: String,
}

/// Optional advisory wallet-ownership proof exchanged during the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBundle {
    pub addresses: Vec<String>,
    pub timestamp: String,
    pub proof: String,
}

/// The subset of a [`WalletBundle`] that is actually signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletBundleBody {
    pub addresses: Vec<String>,
    pub timestamp: String,
    pub did: String,
}

/// Where an initiator is in the three-message exchange (§4.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiatorState {
    Idle,
    InitSent,
    AckReceived,
    ConfirmSent,
    Active,
    Failed(String),
}

/// Where a responder is in the three-message exchange (§4.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderState {
    Idle,
    InitReceived,
    AckSent,
    ConfirmReceived,
    Active,
    Failed(String),
}

/// Outcome of a completed handshake from either role: whether the peer's
/// wallet ownership proof (if any was attached) validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletVerification {
    NotProvided,
    Verified,
    Failed,
}
