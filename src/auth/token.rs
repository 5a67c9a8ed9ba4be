use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TOKEN_TTL_MINUTES;

/// Represents the claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch). The token is invalid from this instant on.
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Failed to generate token: {0}")]
    Encoding(String),
}

/// Issues and verifies HS256-signed, time-limited bearer tokens.
///
/// The signing secret is handed in at construction; nothing here reads the
/// process environment, so each test can run with its own secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Token service with the default 30 minute lifetime.
    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }

    /// Issues a token for `subject` using the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issues a token for `subject` that expires `ttl` from now.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Encoding(format!("token lifetime out of range: {}", ttl)))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verifies signature, structure and expiry, returning the decoded claims.
    ///
    /// A token is expired once the current time reaches `exp`; no leeway is applied.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })?;

        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_and_verification() {
        let service = TokenService::with_default_ttl("test_secret_for_gen_verify");
        let token = service.issue("alice").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_zero_ttl_is_rejected_immediately() {
        let service = TokenService::with_default_ttl("test_secret_for_expiration");
        let token = service.issue_with_ttl("alice", Duration::zero()).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_token_expiration() {
        let service = TokenService::with_default_ttl("test_secret_for_expiration");
        let token = service.issue_with_ttl("bob", Duration::hours(-2)).unwrap();

        assert!(matches!(service.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn test_out_of_range_ttl_is_an_error() {
        let service = TokenService::with_default_ttl("test_secret_for_overflow");
        let result = service.issue_with_ttl("alice", Duration::days(365_000_000));

        assert!(matches!(result, Err(TokenError::Encoding(_))));
    }

    #[test]
    fn test_invalid_token_signature() {
        let issuer = TokenService::with_default_ttl("one_secret");
        let verifier = TokenService::with_default_ttl("a_completely_different_secret");
        let token = issuer.issue("alice").unwrap();

        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let service = TokenService::with_default_ttl("secret");
        let token = service.issue("alice").unwrap();
        let other = service.issue("mallory").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(service.verify(&forged), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_malformed_token() {
        let service = TokenService::with_default_ttl("secret");
        assert!(matches!(service.verify("not-a-jwt"), Err(TokenError::Invalid(_))));
        assert!(matches!(service.verify(""), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_debug_does_not_leak_secret() {
        let service = TokenService::with_default_ttl("hunter2-secret");
        assert!(!format!("{:?}", service).contains("hunter2"));
    }
}
