//! # Envelope Subsystem (C2)
//!
//! Builds and verifies `atel.msg.v1` signed message envelopes on top of
//! [`atpc_identity`], plus the replay-protection and rate-limiting
//! primitives the rest of the protocol surface needs at the edge.

pub mod domain;

pub use domain::build::build_envelope;
pub use domain::entities::{Envelope, EnvelopeBody, EnvelopeType, VerificationOutcome, ENVELOPE_TAG};
pub use domain::errors::EnvelopeError;
pub use domain::nonce_tracker::NonceTracker;
pub use domain::rate_limiter::RateLimiter;
pub use domain::verify::{verify_message, VerifyOptions, DEFAULT_MAX_AGE_MS};
