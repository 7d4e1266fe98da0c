//! Auth module
//!
//! Authentication operations using trait-based dependency injection for testability.
//!
//! ## Structure
//! - `service.rs` - Business logic (testable, framework-independent)
//! - `tests.rs` - Tests against a mock repository

pub mod service;


pub use service::AuthService;
