//! # Wallet Bundle
//!
//! Optional, advisory proof-of-ownership for a set of external addresses,
//! signed over `{addresses, timestamp, did}` by the owning DID's secret key.
//! Absence never fails a handshake; a bad signature just marks the bundle
//! unverified.

use atpc_identity::{sign, verify, AgentIdentity};
use chrono::Utc;

use super::entities::{WalletBundle, WalletBundleBody};

pub fn sign_wallet_bundle(identity: &AgentIdentity, addresses: Vec<String>) -> WalletBundle {
    let body = WalletBundleBody {
        addresses: addresses.clone(),
        timestamp: Utc::now().to_rfc3339(),
        did: identity.did.clone(),
    };
    let proof = sign(&body, identity).expect("canonicalization of a wallet bundle cannot fail");

    WalletBundle { addresses, timestamp: body.timestamp, proof }
}

/// Verifies `bundle`'s proof was signed by the secret key behind `did`,
/// using `public_key` (the public key declared alongside `did` in the same
/// handshake message).
pub fn verify_wallet_bundle(bundle: &WalletBundle, did: &str, public_key: &[u8; 32]) -> bool {
    let body = WalletBundleBody {
        addresses: bundle.addresses.clone(),
        timestamp: bundle.timestamp.clone(),
        did: did.to_string(),
    };
    verify(&body, &bundle.proof, public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn valid_bundle_verifies() {
        let identity = AgentIdentity::generate("agent-a", HashMap::new());
        let bundle = sign_wallet_bundle(&identity, vec!["0xabc".to_string()]);
        assert!(verify_wallet_bundle(&bundle, &identity.did, &identity.public_key));
    }

    #[test]
    fn tampered_addresses_fail_verification() {
        let identity = AgentIdentity::generate("agent-a", HashMap::new());
        let mut bundle = sign_wallet_bundle(&identity, vec!["0xabc".to_string()]);
        bundle.addresses.push("0xdeadbeef".to_string());
        assert!(!verify_wallet_bundle(&bundle, &identity.did, &identity.public_key));
    }
}
