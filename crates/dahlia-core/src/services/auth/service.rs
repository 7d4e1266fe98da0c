//! Auth business logic
//!
//! Sign-up, login, token refresh and logout on top of a [`UserRepository`].
//! Session state lives only in the user's stored refresh token: a refresh
//! token is honoured while it verifies and equals that stored value.

use subtle::ConstantTimeEq;

use crate::auth::{hash_password, verify_password, AuthContext, TokenService};
use crate::db::UserRepository;
use crate::error::{Error, Result};
use crate::models::{AuthPayload, User, UserResponse};

pub struct AuthService<R: UserRepository> {
    repo: R,
    tokens: TokenService,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Register a user and log them in with a fresh refresh token.
    ///
    /// User creation and token storage are two separate writes; if the
    /// second fails the user exists without a usable refresh token and has
    /// to log in.
    pub async fn sign_up(&self, username: &str, password: &str) -> Result<AuthPayload> {
        validate_credentials(username, password)?;

        if self.repo.find_by_username(username).await?.is_some() {
            return Err(Error::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let id = self.repo.create_user(username, &password_hash).await?;

        let refresh_token = self.tokens.issue_refresh_token(id)?;
        self.repo.set_refresh_token(id, Some(&refresh_token)).await?;

        log::info!("Signed up user {} ({})", id, username);
        Ok(AuthPayload::with_refresh_token(
            refresh_token,
            UserResponse::new(id, username),
        ))
    }

    /// Check credentials and issue a new refresh token, replacing any
    /// previous one (which ends that session). Empty credentials are not
    /// special-cased: they fail as an unknown user or a wrong password.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthPayload> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(Error::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            log::debug!("Rejected password for user {}", user.id);
            return Err(Error::InvalidPassword);
        }

        let refresh_token = self.tokens.issue_refresh_token(user.id)?;
        self.repo.set_refresh_token(user.id, Some(&refresh_token)).await?;

        log::info!("User {} logged in", user.id);
        Ok(AuthPayload::with_refresh_token(
            refresh_token,
            UserResponse::from(user),
        ))
    }

    /// Exchange a live refresh token for a new access token.
    /// The refresh token itself is left unchanged.
    pub async fn token(&self, refresh_token: &str) -> Result<AuthPayload> {
        let user = self.authorize_refresh_token(refresh_token).await?;
        let access_token = self.tokens.issue_access_token(user.id, &user.username)?;

        log::debug!("Issued access token for user {}", user.id);
        Ok(AuthPayload::with_access_token(
            access_token,
            UserResponse::from(user),
        ))
    }

    /// Clear the stored refresh token so the presented one stops working
    pub async fn logout(&self, refresh_token: &str) -> Result<AuthPayload> {
        let user = self.authorize_refresh_token(refresh_token).await?;
        self.repo.set_refresh_token(user.id, None).await?;

        log::info!("User {} logged out", user.id);
        Ok(AuthPayload::user_only(UserResponse::from(user)))
    }

    /// Resolve the user behind an authenticated request
    pub async fn me(&self, auth: &AuthContext) -> Result<UserResponse> {
        let claims = auth.require()?;
        let user = self
            .repo
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or(Error::Unauthorized)?;

        Ok(UserResponse::from(user))
    }

    async fn authorize_refresh_token(&self, refresh_token: &str) -> Result<User> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;

        let user = self
            .repo
            .find_by_id(claims.user_id()?)
            .await?
            .ok_or(Error::Unauthorized)?;

        if !stored_token_matches(user.refresh_token.as_deref(), refresh_token) {
            log::debug!("Refresh token for user {} does not match stored value", user.id);
            return Err(Error::Unauthorized);
        }

        Ok(user)
    }
}

fn stored_token_matches(stored: Option<&str>, presented: &str) -> bool {
    match stored {
        Some(stored) => stored.as_bytes().ct_eq(presented.as_bytes()).into(),
        None => false,
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::validation("username must not be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("password must not be empty"));
    }
    Ok(())
}
