//! Unified error handling for dahlia-core

use thiserror::Error;

/// Core error type for dahlia-core
#[derive(Error, Debug)]
pub enum Error {
    /// Bad signature, malformed token, or expired access token
    #[error("bad token")]
    InvalidToken,

    /// Token verified but does not match the stored value, or no auth context
    #[error("unauthorized")]
    Unauthorized,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("user already exists")]
    UserAlreadyExists,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Token encoding error: {0}")]
    TokenEncoding(jsonwebtoken::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for dahlia-core
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Stable machine-readable code for the boundary layer
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidToken => "INVALID_TOKEN",
            Error::Unauthorized => "UNAUTHORIZED",
            Error::UserNotFound => "USER_NOT_FOUND",
            Error::InvalidPassword => "INVALID_PASSWORD",
            Error::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Error::Database(_) => "STORE_ERROR",
            Error::Validation(_) => "BAD_REQUEST",
            Error::PasswordHash(_)
            | Error::TokenEncoding(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::Config(_)
            | Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure comes from our side rather than the caller's input
    pub fn is_internal(&self) -> bool {
        matches!(self.code(), "STORE_ERROR" | "INTERNAL_ERROR")
    }
}

// Convert to String for command-line error reporting
impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
