//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::cache::CacheStats;
use crate::generation::export::{self, ExportFormat};
use crate::generation::pipeline::{GenerateOptions, HistoryEntry, PipelineError};
use crate::models::brand::{BrandProfile, ContentBrief};
use crate::models::platform::Platform;
use crate::models::result::{GenerationResult, PlatformResults};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub brand_profile: BrandProfile,
    pub content_brief: ContentBrief,
    #[serde(default = "default_true")]
    pub include_scoring: bool,
    #[serde(default = "default_true")]
    pub save_to_history: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub results: PlatformResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_platform: Option<Platform>,
    pub cancelled: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlatformGenerateRequest {
    pub brand_profile: BrandProfile,
    pub content_brief: ContentBrief,
    #[serde(default = "default_true")]
    pub include_scoring: bool,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Fan-out generation for all platforms. Per-platform provider failures are
/// reported inside `results`; a cancelled run returns `cancelled: true` with
/// no results rather than an error.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let options = GenerateOptions {
        include_scoring: request.include_scoring,
        save_to_history: request.save_to_history,
        progress: None,
    };

    let results = match state
        .pipeline
        .generate_all(&request.brand_profile, &request.content_brief, &options)
        .await
    {
        Ok(results) => results,
        Err(PipelineError::Cancelled) => {
            return Ok(Json(GenerateResponse {
                results: PlatformResults::new(),
                average_score: None,
                best_platform: None,
                cancelled: true,
            }))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(GenerateResponse {
        average_score: export::average_score(&results),
        best_platform: export::best_platform(&results),
        results,
        cancelled: false,
    }))
}

/// POST /api/v1/generate/:platform
///
/// Single-platform generation with the relaxed input requirements.
pub async fn handle_generate_platform(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Json(request): Json<PlatformGenerateRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let result = state
        .pipeline
        .generate_for_platform(
            &request.brand_profile,
            &request.content_brief,
            platform,
            request.include_scoring,
        )
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/regenerate/:platform
///
/// Invalidates the cached result for the platform and generates fresh
/// content.
pub async fn handle_regenerate_platform(
    State(state): State<AppState>,
    Path(platform): Path<Platform>,
    Json(request): Json<PlatformGenerateRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let result = state
        .pipeline
        .regenerate_platform(
            &request.brand_profile,
            &request.content_brief,
            platform,
            request.include_scoring,
        )
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/cancel
pub async fn handle_cancel(State(state): State<AppState>) -> Json<CancelResponse> {
    state.pipeline.cancel_generation();
    Json(CancelResponse { cancelled: true })
}

/// GET /api/v1/history
///
/// Recorded generation runs, newest first.
pub async fn handle_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let entries = state.pipeline.history();
    Json(HistoryResponse {
        total: entries.len(),
        entries,
    })
}

/// GET /api/v1/export?format=json
///
/// Exports the latest generation run with summary statistics.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let format = match query.format.as_deref() {
        None => ExportFormat::Json,
        Some(raw) => ExportFormat::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unsupported export format: {raw}")))?,
    };

    let latest = state
        .pipeline
        .latest_history()
        .ok_or_else(|| AppError::NotFound("No generation results to export".to_string()))?;

    let body = export::export_results(latest.results, format).map_err(anyhow::Error::from)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// GET /api/v1/cache/stats
pub async fn handle_cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.pipeline.cache_stats())
}

/// DELETE /api/v1/cache
pub async fn handle_clear_cache(State(state): State<AppState>) -> StatusCode {
    state.pipeline.clear_cache();
    StatusCode::NO_CONTENT
}
