//! Authentication module - token issuance, password hashing, request context

pub mod context;
pub mod password;
pub mod token;

pub use context::AuthContext;
pub use password::{hash_password, verify_password, PASSWORD_HASH_COST};
pub use token::TokenService;
