//! # dahlia-core
//!
//! Core authentication logic for Dahlia - shared between CLI and server.
//!
//! This crate provides:
//! - Database operations and the user repository (`db` module)
//! - Data models and token claims (`models` module)
//! - Token issuance, password hashing, request context (`auth` module)
//! - Sign-up / login / token / logout and dice rolling (`services` module)
//! - Single-endpoint operation dispatch (`gateway` module)
//! - Signing configuration (`config` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;

// Re-exports for convenience
pub use auth::{AuthContext, TokenService};
pub use config::AuthConfig;
pub use db::{Database, SqliteUserRepository, UserRepository};
pub use error::{Error, Result};
pub use gateway::{Gateway, Operation, OperationOutput};
pub use models::{AccessClaims, AuthPayload, RefreshClaims, User, UserResponse};
pub use services::AuthService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}
