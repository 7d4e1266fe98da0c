//! Auth commands
//!
//! Sign up, log in, exchange refresh tokens and log out.

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use dahlia_core::{AuthContext, UserResponse};

use crate::output::{print_payload, print_single, print_success};
use super::Context;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create a user and print its refresh token
    SignUp {
        /// Username (must be unique)
        username: String,

        /// Password
        #[arg(long, short, env = "DAHLIA_PASSWORD")]
        password: String,
    },

    /// Log in and print a new refresh token
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long, short, env = "DAHLIA_PASSWORD")]
        password: String,
    },

    /// Exchange a refresh token for a short-lived access token
    Token {
        /// Refresh token from sign-up or login
        refresh_token: String,
    },

    /// Invalidate a refresh token
    Logout {
        /// Refresh token from sign-up or login
        refresh_token: String,
    },

    /// Show the user behind an access token
    Whoami {
        /// Access token from `auth token`
        #[arg(long, env = "DAHLIA_ACCESS_TOKEN")]
        access_token: String,
    },
}

/// User row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct UserRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Username")]
    pub username: String,
}

impl From<UserResponse> for UserRow {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

pub async fn execute(ctx: &Context, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::SignUp { username, password } => sign_up(ctx, &username, &password).await,
        AuthAction::Login { username, password } => login(ctx, &username, &password).await,
        AuthAction::Token { refresh_token } => token(ctx, &refresh_token).await,
        AuthAction::Logout { refresh_token } => logout(ctx, &refresh_token).await,
        AuthAction::Whoami { access_token } => whoami(ctx, &access_token).await,
    }
}

async fn sign_up(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let payload = ctx.gateway.auth().sign_up(username, password).await?;
    print_success(&format!("Signed up {}", username), ctx.quiet);
    print_payload(&payload, ctx.format)
}

async fn login(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let payload = ctx.gateway.auth().login(username, password).await?;
    print_success(&format!("Logged in as {}", username), ctx.quiet);
    print_payload(&payload, ctx.format)
}

async fn token(ctx: &Context, refresh_token: &str) -> Result<()> {
    let payload = ctx.gateway.auth().token(refresh_token).await?;
    print_payload(&payload, ctx.format)
}

async fn logout(ctx: &Context, refresh_token: &str) -> Result<()> {
    let payload = ctx.gateway.auth().logout(refresh_token).await?;
    print_success("Logged out", ctx.quiet);
    print_payload(&payload, ctx.format)
}

async fn whoami(ctx: &Context, access_token: &str) -> Result<()> {
    let auth = AuthContext::from_access_token(access_token, ctx.gateway.auth().tokens())?;
    let user = ctx.gateway.auth().me(&auth).await?;
    print_single(&UserRow::from(user), ctx.format)
}
