//! # Handshake State Machine
//!
//! Drives the three-message mutual challenge-response exchange described in
//! §4.4. Each `build_*` function produces a signed envelope to send; each
//! `process_*` function validates an incoming envelope and returns its
//! parsed payload, advancing no further than the checks it performs allow.

use atpc_envelope::{build_envelope, verify_message, Envelope, EnvelopeType, VerifyOptions};
use atpc_identity::{parse_did, AgentIdentity};
use base64::{engine::general_purpose::STANDARD, Engine};
use x25519_dalek::PublicKey;

use super::challenge_store::ChallengeStore;
use super::entities::{HandshakeAck, HandshakeConfirm, HandshakeInit, WalletBundle};
use super::errors::HandshakeError;

fn encode_key(key: &[u8]) -> String {
    STANDARD.encode(key)
}

fn decode_pub(b64: &str) -> Result<[u8; 32], HandshakeError> {
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| HandshakeError::MalformedPayload("public key must be 32 bytes".into()))
}

/// Verifies an incoming envelope's signature under its declared sender,
/// checking that the declared sender DID's public key is self-consistent
/// with `claimed_pub` (the `pub_a`/`pub_b` field carried in the payload).
fn verify_envelope_and_identity(
    envelope: &Envelope,
    claimed_did: &str,
    claimed_pub: &str,
) -> Result<(), HandshakeError> {
    if envelope.from != claimed_did {
        return Err(HandshakeError::DidPublicKeyMismatch);
    }
    let pub_from_did = parse_did(claimed_did).map_err(|_| HandshakeError::DidPublicKeyMismatch)?;
    let claimed = decode_pub(claimed_pub)?;
    if pub_from_did != claimed {
        return Err(HandshakeError::DidPublicKeyMismatch);
    }

    let outcome = verify_message(envelope, &pub_from_did, VerifyOptions::default());
    if !outcome.valid {
        return Err(if outcome.error.as_deref() == Some("timestamp outside allowed window") {
            HandshakeError::Expired
        } else {
            HandshakeError::BadSignature
        });
    }
    Ok(())
}

/// A → B: builds `HANDSHAKE_INIT`, issuing and recording the challenge A
/// will expect B to echo back signed.
pub fn build_init(
    identity: &AgentIdentity,
    to: &str,
    enc_public: PublicKey,
    challenges: &ChallengeStore,
    wallets: Option<WalletBundle>,
) -> Result<Envelope, HandshakeError> {
    let challenge_a = challenges.issue(to);
    let payload = HandshakeInit {
        did_a: identity.did.clone(),
        pub_a: encode_key(&identity.public_key),
        enc_pub_a: encode_key(enc_public.as_bytes()),
        challenge_a,
        wallets,
    };
    build_envelope(
        identity,
        EnvelopeType::HandshakeInit,
        to,
        serde_json::to_value(&payload).map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?,
    )
    .map_err(|_| HandshakeError::BadSignature)
}

/// B receives `HANDSHAKE_INIT`: checks the envelope self-consistency only
/// (the signature's issuer is the party presenting the challenge, so there
/// is nothing yet for B to have pre-stored).
pub fn process_init(envelope: &Envelope) -> Result<HandshakeInit, HandshakeError> {
    if envelope.msg_type != EnvelopeType::HandshakeInit {
        return Err(HandshakeError::UnexpectedMessage);
    }
    let payload: HandshakeInit = serde_json::from_value(envelope.payload.clone())
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;
    verify_envelope_and_identity(envelope, &payload.did_a, &payload.pub_a)?;
    Ok(payload)
}

/// B → A: builds `HANDSHAKE_ACK`, signing A's challenge and issuing B's own.
pub fn build_ack(
    identity: &AgentIdentity,
    init: &HandshakeInit,
    to: &str,
    enc_public: PublicKey,
    challenges: &ChallengeStore,
    wallets: Option<WalletBundle>,
) -> Result<Envelope, HandshakeError> {
    let sign_b_challenge_a = atpc_identity::sign(&init.challenge_a, identity)
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;
    let challenge_b = challenges.issue(to);

    let payload = HandshakeAck {
        did_b: identity.did.clone(),
        pub_b: encode_key(&identity.public_key),
        enc_pub_b: encode_key(enc_public.as_bytes()),
        challenge_b,
        sign_b_challenge_a,
        wallets,
    };
    build_envelope(
        identity,
        EnvelopeType::HandshakeAck,
        to,
        serde_json::to_value(&payload).map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?,
    )
    .map_err(|_| HandshakeError::BadSignature)
}

/// A receives `HANDSHAKE_ACK`: verifies the envelope, then verifies B's
/// signature over the challenge A issued, consuming it so a second ACK
/// carrying the same challenge is rejected as a replay.
pub fn process_ack(
    envelope: &Envelope,
    challenges: &ChallengeStore,
) -> Result<HandshakeAck, HandshakeError> {
    if envelope.msg_type != EnvelopeType::HandshakeAck {
        return Err(HandshakeError::UnexpectedMessage);
    }
    let payload: HandshakeAck = serde_json::from_value(envelope.payload.clone())
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;
    verify_envelope_and_identity(envelope, &payload.did_b, &payload.pub_b)?;

    let pub_b = decode_pub(&payload.pub_b)?;
    let issued = challenges
        .peek(&payload.did_b)
        .ok_or_else(|| HandshakeError::UnknownChallenge(payload.did_b.clone()))?;
    if !atpc_identity::verify(&issued, &payload.sign_b_challenge_a, &pub_b) {
        return Err(HandshakeError::ChallengeVerificationFailed);
    }
    // Challenge A issued to B has now been echoed back correctly; consume it.
    if !challenges.consume_if_matches(&payload.did_b, &issued) {
        return Err(HandshakeError::ReplayedChallenge);
    }
    Ok(payload)
}

/// A → B: builds `HANDSHAKE_CONFIRM`, signing B's challenge.
pub fn build_confirm(identity: &AgentIdentity, to: &str, ack: &HandshakeAck) -> Result<Envelope, HandshakeError> {
    let sign_a_challenge_b = atpc_identity::sign(&ack.challenge_b, identity)
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;
    let payload = HandshakeConfirm { sign_a_challenge_b };
    build_envelope(
        identity,
        EnvelopeType::HandshakeConfirm,
        to,
        serde_json::to_value(&payload).map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?,
    )
    .map_err(|_| HandshakeError::BadSignature)
}

/// B receives `HANDSHAKE_CONFIRM`: the message itself carries only the
/// signature (§4.4), so the sender's identity comes from `envelope.from`
/// and the challenge it must cover from the one B issued during ACK.
pub fn process_confirm(envelope: &Envelope, challenges: &ChallengeStore) -> Result<(), HandshakeError> {
    if envelope.msg_type != EnvelopeType::HandshakeConfirm {
        return Err(HandshakeError::UnexpectedMessage);
    }
    let payload: HandshakeConfirm = serde_json::from_value(envelope.payload.clone())
        .map_err(|e| HandshakeError::MalformedPayload(e.to_string()))?;

    let from_did = envelope.from.clone();
    let from_pub = parse_did(&from_did).map_err(|_| HandshakeError::DidPublicKeyMismatch)?;

    let outcome = verify_message(envelope, &from_pub, VerifyOptions::default());
    if !outcome.valid {
        return Err(if outcome.error.as_deref() == Some("timestamp outside allowed window") {
            HandshakeError::Expired
        } else {
            HandshakeError::BadSignature
        });
    }

    let issued = challenges
        .peek(&from_did)
        .ok_or_else(|| HandshakeError::UnknownChallenge(from_did.clone()))?;
    if !atpc_identity::verify(&issued, &payload.sign_a_challenge_b, &from_pub) {
        return Err(HandshakeError::ChallengeVerificationFailed);
    }
    if !challenges.consume_if_matches(&from_did, &issued) {
        return Err(HandshakeError::ReplayedChallenge);
    }
    Ok(())
}
