//! # dahlia-server
//!
//! HTTP boundary for the Dahlia authentication gateway: a single query
//! endpoint in front of [`dahlia_core::Gateway`].

pub mod api;

pub use api::{create_router, AppState};
