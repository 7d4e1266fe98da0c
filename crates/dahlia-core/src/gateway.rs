//! Single-endpoint operation dispatch
//!
//! Requests name one operation plus its arguments:
//!
//! ```json
//! { "operation": "token", "arguments": { "refreshToken": "..." } }
//! ```

use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, TokenService};
use crate::db::UserRepository;
use crate::error::Result;
use crate::models::AuthPayload;
use crate::services::{dice, AuthService};

/// Operations accepted by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    tag = "operation",
    content = "arguments",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Operation {
    Login {
        username: String,
        password: String,
    },
    Token {
        refresh_token: String,
    },
    SignUp {
        username: String,
        password: String,
    },
    Logout {
        refresh_token: String,
    },
    RollDice {
        num_dice: u32,
        #[serde(default)]
        num_sides: Option<u32>,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Login { .. } => "login",
            Operation::Token { .. } => "token",
            Operation::SignUp { .. } => "signUp",
            Operation::Logout { .. } => "logout",
            Operation::RollDice { .. } => "rollDice",
        }
    }
}

/// Result of a successful operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Auth(AuthPayload),
    Dice(Vec<u32>),
}

pub struct Gateway<R: UserRepository> {
    auth: AuthService<R>,
}

impl<R: UserRepository> Gateway<R> {
    pub fn new(repo: R, tokens: TokenService) -> Self {
        Self {
            auth: AuthService::new(repo, tokens),
        }
    }

    pub fn auth(&self) -> &AuthService<R> {
        &self.auth
    }

    /// Build the request context from an optional `Authorization` header
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AuthContext> {
        AuthContext::from_bearer(authorization, self.auth.tokens())
    }

    pub async fn execute(&self, operation: Operation, ctx: &AuthContext) -> Result<OperationOutput> {
        log::debug!("Executing operation {}", operation.name());

        let output = match operation {
            Operation::Login { username, password } => {
                OperationOutput::Auth(self.auth.login(&username, &password).await?)
            }
            Operation::Token { refresh_token } => {
                OperationOutput::Auth(self.auth.token(&refresh_token).await?)
            }
            Operation::SignUp { username, password } => {
                OperationOutput::Auth(self.auth.sign_up(&username, &password).await?)
            }
            Operation::Logout { refresh_token } => {
                OperationOutput::Auth(self.auth.logout(&refresh_token).await?)
            }
            Operation::RollDice {
                num_dice,
                num_sides,
            } => OperationOutput::Dice(dice::roll_dice(num_dice, num_sides, ctx)?),
        };

        Ok(output)
    }
}
