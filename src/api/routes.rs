//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::{
    bootstrap_handler, drop_handler, health_handler, records_handler, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/health", get(health_handler))
        // Game endpoints (init-data authenticated)
        .route("/api/bootstrap", post(bootstrap_handler))
        .route("/api/drop", post(drop_handler))
        .route("/api/records", post(records_handler))
        // Attach shared state
        .with_state(state)
}
