pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-content",
            post(handlers::handle_generate_content),
        )
        .route(
            "/api/recent-generations",
            get(handlers::handle_recent_generations),
        )
        .route("/api/generations/:id", get(handlers::handle_get_generation))
        .with_state(state)
}
