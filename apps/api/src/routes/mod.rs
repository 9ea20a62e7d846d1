pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route("/api/v1/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/generate/:platform",
            post(handlers::handle_generate_platform),
        )
        .route(
            "/api/v1/regenerate/:platform",
            post(handlers::handle_regenerate_platform),
        )
        .route("/api/v1/cancel", post(handlers::handle_cancel))
        // History and export
        .route("/api/v1/history", get(handlers::handle_history))
        .route("/api/v1/export", get(handlers::handle_export))
        // Cache management
        .route("/api/v1/cache/stats", get(handlers::handle_cache_stats))
        .route("/api/v1/cache", delete(handlers::handle_clear_cache))
        .with_state(state)
}
