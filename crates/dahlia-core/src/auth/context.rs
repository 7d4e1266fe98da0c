//! Per-request authentication context

use crate::error::{Error, Result};
use crate::models::AccessClaims;

use super::TokenService;

const BEARER_SCHEME: &str = "Bearer";

/// What the caller proved about itself for this request. Operations that
/// need an authenticated caller must check it explicitly via [`AuthContext::require`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    claims: Option<AccessClaims>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(claims: AccessClaims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// Build a context from an `Authorization` header value.
    ///
    /// The header must be `<scheme> <credentials>`. The scheme is matched
    /// case-insensitively; a scheme other than bearer, or an empty bearer
    /// token, leaves the request anonymous. A header of any other shape, or a
    /// bearer token that fails verification, is an error, which the HTTP
    /// boundary reports as 401.
    pub fn from_bearer(header: Option<&str>, tokens: &TokenService) -> Result<Self> {
        let Some(header) = header else {
            return Ok(Self::anonymous());
        };

        let (scheme, token) = header.split_once(' ').ok_or(Error::InvalidToken)?;
        if token.contains(' ') {
            return Err(Error::InvalidToken);
        }

        if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            log::debug!("Ignoring authorization scheme {}", scheme);
            return Ok(Self::anonymous());
        }
        if token.is_empty() {
            return Ok(Self::anonymous());
        }

        Self::from_access_token(token, tokens)
    }

    /// Build a context from a raw access token
    pub fn from_access_token(token: &str, tokens: &TokenService) -> Result<Self> {
        tokens.verify_access_token(token).map(Self::authenticated)
    }

    pub fn claims(&self) -> Option<&AccessClaims> {
        self.claims.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// Claims of the authenticated caller, or `Unauthorized`
    pub fn require(&self) -> Result<&AccessClaims> {
        self.claims.as_ref().ok_or(Error::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn create_test_service() -> TokenService {
        TokenService::new(&AuthConfig::new("access-secret", "refresh-secret").unwrap())
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let ctx = AuthContext::from_bearer(None, &create_test_service()).unwrap();
        assert!(!ctx.is_authenticated());
        assert!(matches!(ctx.require(), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_valid_bearer() {
        let tokens = create_test_service();
        let access = tokens.issue_access_token(3, "dave").unwrap();
        let header = format!("Bearer {}", access);

        let ctx = AuthContext::from_bearer(Some(&header), &tokens).unwrap();

        let claims = ctx.require().unwrap();
        assert_eq!(claims.username, "dave");
        assert_eq!(claims.user_id().unwrap(), 3);
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let tokens = create_test_service();
        let access = tokens.issue_access_token(4, "erin").unwrap();

        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let header = format!("{} {}", scheme, access);
            let ctx = AuthContext::from_bearer(Some(&header), &tokens).unwrap();
            assert_eq!(ctx.require().unwrap().username, "erin");
        }
    }

    #[test]
    fn test_other_scheme_is_anonymous() {
        let tokens = create_test_service();

        for header in ["Basic dXNlcjpwdw==", "Token abc", "Bearer "] {
            let ctx = AuthContext::from_bearer(Some(header), &tokens).unwrap();
            assert!(!ctx.is_authenticated(), "{}", header);
        }
    }

    #[test]
    fn test_invalid_bearer_is_error() {
        let tokens = create_test_service();

        for header in ["Bearer nope", "garbage", "", "Bearer a b", "Basic a b"] {
            assert!(
                matches!(
                    AuthContext::from_bearer(Some(header), &tokens),
                    Err(Error::InvalidToken)
                ),
                "{}",
                header
            );
        }
    }

    #[test]
    fn test_refresh_token_is_not_a_bearer() {
        let tokens = create_test_service();
        let refresh = tokens.issue_refresh_token(3).unwrap();
        let header = format!("Bearer {}", refresh);

        assert!(AuthContext::from_bearer(Some(&header), &tokens).is_err());
    }
}
