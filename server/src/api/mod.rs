//! API module - Axum routes

pub mod query;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use dahlia_core::{Gateway, SqliteUserRepository};

/// Shared handler state
pub type AppState = Arc<Gateway<SqliteUserRepository>>;

/// Create the API router with all routes
pub fn create_router(gateway: AppState) -> Router {
    Router::new()
        .route("/graphql", post(query::query))
        .route("/health", get(query::health))
        .with_state(gateway)
}
