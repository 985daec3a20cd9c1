//! Axum route handlers for the content generation API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::request::{ContentRequest, FieldError};
use crate::models::generation::{GenerationRecord, NewGeneration};
use crate::state::AppState;

/// Upper bound on `limit` for the recent generations listing.
const MAX_RECENT_LIMIT: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub generation: GenerationRecord,
}

#[derive(Debug, Serialize)]
pub struct RecentGenerationsResponse {
    pub success: bool,
    pub generations: Vec<GenerationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-content
///
/// Validates the request, generates content, stores the result and returns the record.
pub async fn handle_generate_content(
    State(state): State<AppState>,
    payload: Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::validation(vec![FieldError {
            path: "body".to_string(),
            message: rejection.body_text(),
        }])
    })?;
    request.validate().map_err(AppError::validation)?;

    let generated_content = state.generator.generate(&request).await?;

    let generation = state
        .store
        .save(NewGeneration {
            request,
            generated_content,
        })
        .await?;

    info!(
        "Saved generation {} ({} via {})",
        generation.id,
        generation.request.content_type,
        state.generator.provider_name()
    );

    Ok(Json(GenerationResponse {
        success: true,
        generation,
    }))
}

/// GET /api/recent-generations
///
/// Returns the newest generations first.
pub async fn handle_recent_generations(
    State(state): State<AppState>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<Json<RecentGenerationsResponse>, AppError> {
    let Query(params) = query.map_err(|rejection| {
        AppError::validation(vec![FieldError {
            path: "limit".to_string(),
            message: rejection.body_text(),
        }])
    })?;
    let limit = params
        .limit
        .unwrap_or(state.recent_limit)
        .min(MAX_RECENT_LIMIT);
    let generations = state.store.recent(limit).await?;

    Ok(Json(RecentGenerationsResponse {
        success: true,
        generations,
    }))
}

/// GET /api/generations/:id
pub async fn handle_get_generation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GenerationResponse>, AppError> {
    let generation = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Generation {id} not found")))?;

    Ok(Json(GenerationResponse {
        success: true,
        generation,
    }))
}
