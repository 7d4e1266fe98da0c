//! Data models for the Dahlia gateway

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{Error, Result};

/// User model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response (without sensitive fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

impl UserResponse {
    pub fn new(id: i64, username: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            username: username.into(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::new(user.id, user.username)
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone())
    }
}

/// Result of an authentication operation. Only the fields the operation
/// produces are set; the rest are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl AuthPayload {
    pub fn with_refresh_token(refresh_token: String, user: UserResponse) -> Self {
        Self {
            refresh_token: Some(refresh_token),
            access_token: None,
            user: Some(user),
        }
    }

    pub fn with_access_token(access_token: String, user: UserResponse) -> Self {
        Self {
            refresh_token: None,
            access_token: Some(access_token),
            user: Some(user),
        }
    }

    pub fn user_only(user: UserResponse) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }
}

/// Access token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    pub fn user_id(&self) -> Result<i64> {
        parse_subject(&self.sub)
    }
}

/// Refresh token claims. There is no `exp`: refresh tokens live until they
/// are replaced or cleared on the user record. `jti` is random per mint, so
/// two logins within the same second still yield distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub jti: String,
}

impl RefreshClaims {
    pub fn user_id(&self) -> Result<i64> {
        parse_subject(&self.sub)
    }
}

fn parse_subject(sub: &str) -> Result<i64> {
    sub.parse().map_err(|_| Error::InvalidToken)
}
