//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod auth;
pub mod dice;

use crate::output::OutputFormat;
use dahlia_core::{Gateway, SqliteUserRepository};

/// Shared context for all commands
pub struct Context {
    pub gateway: Gateway<SqliteUserRepository>,
    pub format: OutputFormat,
    pub quiet: bool,
}
