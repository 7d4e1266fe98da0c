//! Access and refresh token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::models::{AccessClaims, RefreshClaims};

/// Mints and verifies HS256 tokens. Access and refresh tokens use separate
/// secrets, so one can never be passed off as the other.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(&config.access_secret),
            access_decoding: DecodingKey::from_secret(&config.access_secret),
            refresh_encoding: EncodingKey::from_secret(&config.refresh_secret),
            refresh_decoding: DecodingKey::from_secret(&config.refresh_secret),
            access_ttl: config.access_token_ttl,
        }
    }

    /// Lifetime of newly issued access tokens
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Create an access token carrying the user id and username
    pub fn issue_access_token(&self, user_id: i64, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        sign(&claims, &self.access_encoding)
    }

    /// Create a refresh token carrying the user id and a random token id.
    /// No expiry is set.
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String> {
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: Utc::now().timestamp(),
            jti: new_token_id(),
        };

        sign(&claims, &self.refresh_encoding)
    }

    /// Verify an access token's signature and expiry
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        verify(token, &self.access_decoding, &access_validation())
    }

    /// Verify a refresh token's signature. The caller still has to compare
    /// it with the value stored on the user record.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        verify(token, &self.refresh_decoding, &refresh_validation())
    }
}

fn new_token_id() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

fn sign<C: Serialize>(claims: &C, key: &EncodingKey) -> Result<String> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(Error::TokenEncoding)
}

fn verify<C: DeserializeOwned>(token: &str, key: &DecodingKey, validation: &Validation) -> Result<C> {
    decode::<C>(token, key, validation)
        .map(|data| data.claims)
        .map_err(|e| {
            log::debug!("Token verification failed: {}", e);
            Error::InvalidToken
        })
}

fn access_validation() -> Validation {
    Validation::new(Algorithm::HS256)
}

fn refresh_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> TokenService {
        TokenService::new(&AuthConfig::new("access-secret", "refresh-secret").unwrap())
    }

    #[test]
    fn test_issue_access_token_format() {
        let service = create_test_service();
        let token = service.issue_access_token(1, "alice").unwrap();

        // header.payload.signature
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_access_token_roundtrip() {
        let service = create_test_service();
        let token = service.issue_access_token(12, "alice").unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, "12");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.user_id().unwrap(), 12);
    }

    #[test]
    fn test_access_token_expires_in_twenty_minutes() {
        let service = create_test_service();
        let token = service.issue_access_token(1, "alice").unwrap();
        let claims = service.verify_access_token(&token).unwrap();

        let expected_exp = (Utc::now() + Duration::minutes(20)).timestamp();
        // Allow 10 seconds tolerance
        assert!((claims.exp - expected_exp).abs() < 10);
        assert_eq!(claims.exp - claims.iat, 20 * 60);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let config = AuthConfig::new("access-secret", "refresh-secret")
            .unwrap()
            .with_access_token_ttl(Duration::minutes(-5));
        let service = TokenService::new(&config);
        let token = service.issue_access_token(1, "alice").unwrap();

        assert!(matches!(
            service.verify_access_token(&token),
            Err(Error::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let service = create_test_service();
        let token = service.issue_refresh_token(99).unwrap();
        let claims = service.verify_refresh_token(&token).unwrap();

        assert_eq!(claims.sub, "99");
        assert_eq!(claims.user_id().unwrap(), 99);
    }

    #[test]
    fn test_refresh_token_has_no_expiry() {
        let service = create_test_service();
        let token = service.issue_refresh_token(5).unwrap();

        let claims = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"refresh-secret"),
            &refresh_validation(),
        )
        .unwrap()
        .claims;

        assert!(claims.get("exp").is_none());
        assert!(claims.get("username").is_none());
        assert_eq!(claims["sub"], "5");
    }

    #[test]
    fn test_refresh_tokens_are_unique_per_issue() {
        let service = create_test_service();
        let first = service.issue_refresh_token(7).unwrap();
        let second = service.issue_refresh_token(7).unwrap();

        assert_ne!(first, second);

        let a = service.verify_refresh_token(&first).unwrap();
        let b = service.verify_refresh_token(&second).unwrap();
        assert_eq!(a.sub, b.sub);
        assert_ne!(a.jti, b.jti);
        assert_eq!(a.jti.len(), 32);
    }

    #[test]
    fn test_refresh_token_wrong_secret() {
        let service = create_test_service();
        let other = TokenService::new(&AuthConfig::new("other-access", "other-refresh").unwrap());
        let token = other.issue_refresh_token(1).unwrap();

        assert!(matches!(
            service.verify_refresh_token(&token),
            Err(Error::InvalidToken)
        ));
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let service = create_test_service();
        let access = service.issue_access_token(1, "alice").unwrap();
        let refresh = service.issue_refresh_token(1).unwrap();

        assert!(service.verify_refresh_token(&access).is_err());
        assert!(service.verify_access_token(&refresh).is_err());
    }

    #[test]
    fn test_verify_malformed_tokens() {
        let service = create_test_service();

        for token in ["", "not-a-jwt", "invalid.token.here"] {
            assert!(matches!(
                service.verify_refresh_token(token),
                Err(Error::InvalidToken)
            ));
            assert!(matches!(
                service.verify_access_token(token),
                Err(Error::InvalidToken)
            ));
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = create_test_service();
        let token = service.issue_refresh_token(1).unwrap();
        let forged = service.issue_refresh_token(2).unwrap();

        // Payload of user 2 with the signature of user 1
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert!(service.verify_refresh_token(&spliced).is_err());
    }
}
