//! # Consent Token Minting & Verification

use atpc_identity::{sign, verify as verify_signature, AgentIdentity};
use chrono::Utc;
use uuid::Uuid;

use super::entities::{ConsentToken, ConsentTokenBody, RiskLevel};
use super::errors::ConsentError;

/// Minting parameters beyond the grant itself.
#[derive(Debug, Clone, Copy)]
pub struct MintOptions {
    pub max_calls: u32,
    pub ttl_sec: i64,
}

/// Mints and signs a new consent token. `issuer` plays the role of the
/// secret passed to `mint` (§4.5); this workspace always signs with an
/// [`AgentIdentity`] rather than a bare key.
pub fn mint(
    issuer: &AgentIdentity,
    subject: impl Into<String>,
    scopes: Vec<String>,
    opts: MintOptions,
    risk_ceiling: RiskLevel,
) -> Result<ConsentToken, ConsentError> {
    if scopes.is_empty() {
        return Err(ConsentError::EmptyScopes);
    }
    if opts.max_calls < 1 {
        return Err(ConsentError::InvalidMaxCalls);
    }

    let iat = Utc::now().timestamp();
    let body = ConsentTokenBody {
        iss: issuer.did.clone(),
        sub: subject.into(),
        scopes,
        max_calls: opts.max_calls,
        iat,
        exp: iat + opts.ttl_sec,
        risk_ceiling,
        nonce: Uuid::new_v4().to_string(),
    };

    let signature = sign(&body, issuer).map_err(|_| ConsentError::InvalidSignature)?;

    Ok(ConsentToken {
        iss: body.iss,
        sub: body.sub,
        scopes: body.scopes,
        max_calls: body.max_calls,
        iat: body.iat,
        exp: body.exp,
        risk_ceiling: body.risk_ceiling,
        nonce: body.nonce,
        signature,
    })
}

/// Verifies a token's signature and that it has not expired.
pub fn verify(token: &ConsentToken, issuer_public_key: &[u8; 32]) -> Result<(), ConsentError> {
    let body = ConsentTokenBody::from(token);
    if !verify_signature(&body, &token.signature, issuer_public_key) {
        return Err(ConsentError::InvalidSignature);
    }
    if Utc::now().timestamp() >= token.exp {
        return Err(ConsentError::Expired(token.exp.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn issuer() -> AgentIdentity {
        AgentIdentity::generate("issuer", HashMap::new())
    }

    #[test]
    fn mint_and_verify_round_trips() {
        let iss = issuer();
        let token = mint(
            &iss,
            "subject-agent",
            vec!["tool:http:get".to_string()],
            MintOptions { max_calls: 5, ttl_sec: 3600 },
            RiskLevel::Medium,
        )
        .unwrap();
        assert!(verify(&token, &iss.public_key).is_ok());
    }

    #[test]
    fn empty_scopes_rejected() {
        let iss = issuer();
        let result = mint(
            &iss,
            "subject-agent",
            vec![],
            MintOptions { max_calls: 5, ttl_sec: 3600 },
            RiskLevel::Low,
        );
        assert!(matches!(result, Err(ConsentError::EmptyScopes)));
    }

    #[test]
    fn zero_max_calls_rejected() {
        let iss = issuer();
        let result = mint(
            &iss,
            "subject-agent",
            vec!["tool:http:get".to_string()],
            MintOptions { max_calls: 0, ttl_sec: 3600 },
            RiskLevel::Low,
        );
        assert!(matches!(result, Err(ConsentError::InvalidMaxCalls)));
    }

    #[test]
    fn expired_token_fails_verification() {
        let iss = issuer();
        let token = mint(
            &iss,
            "subject-agent",
            vec!["tool:http:get".to_string()],
            MintOptions { max_calls: 5, ttl_sec: -10 },
            RiskLevel::Low,
        )
        .unwrap();
        assert!(matches!(verify(&token, &iss.public_key), Err(ConsentError::Expired(_))));
    }

    #[test]
    fn tampered_token_fails_verification() {
        let iss = issuer();
        let mut token = mint(
            &iss,
            "subject-agent",
            vec!["tool:http:get".to_string()],
            MintOptions { max_calls: 5, ttl_sec: 3600 },
            RiskLevel::Low,
        )
        .unwrap();
        token.max_calls = 999;
        assert!(matches!(verify(&token, &iss.public_key), Err(ConsentError::InvalidSignature)));
    }
}
