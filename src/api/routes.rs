//! API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ApiState>`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::digest::{render_stats_message, DIGEST_RECENT_COUNT};
use crate::error::PrognosisError;
use crate::stats::StatsSnapshot;
use crate::store::PredictionStore;
use crate::types::{
    HealthResponse, Prediction, PredictionEnvelope, PredictionInput, PredictionPage, RootInfo,
    SportStatsResponse, TelegramDigest,
};

/// How many predictions the per-sport view includes.
pub const SPORT_RECENT_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub store: PredictionStore,
    pub stats: StatsSnapshot,
    pub default_limit: usize,
}

impl ApiState {
    pub fn new(store: PredictionStore, stats: StatsSnapshot, default_limit: usize) -> Self {
        Self { store, stats, default_limit }
    }

    /// Seeded store, sample snapshot, page size 10.
    #[cfg(test)]
    pub fn sample() -> Self {
        Self::new(PredictionStore::seeded(), StatsSnapshot::sample(), 10)
    }
}

pub type AppState = Arc<ApiState>;

type ApiResult<T> = Result<Json<T>, PrognosisError>;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub sport: Option<String>,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn root() -> Json<RootInfo> {
    Json(RootInfo {
        message: "Sport Prognosis API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.clone())
}

/// GET /api/predictions?sport=&limit=
pub async fn list_predictions(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<PredictionPage> {
    let Query(params) = params?;
    // An empty `sport=` means no filter.
    let sport = params.sport.as_deref().filter(|s| !s.trim().is_empty());
    let limit = params.limit.unwrap_or(state.default_limit);
    Ok(Json(state.store.list(sport, limit).await))
}

/// GET /api/predictions/{id}
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Prediction> {
    Ok(Json(state.store.get(&id).await?))
}

/// POST /api/predictions
pub async fn create_prediction(
    State(state): State<AppState>,
    body: Result<Json<PredictionInput>, JsonRejection>,
) -> ApiResult<PredictionEnvelope> {
    let Json(input) = body?;
    input.validate()?;
    let created = state.store.create(input).await;
    Ok(Json(PredictionEnvelope::created(created)))
}

/// PUT /api/predictions/{id}
pub async fn update_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PredictionInput>, JsonRejection>,
) -> ApiResult<PredictionEnvelope> {
    let Json(input) = body?;
    input.validate()?;
    let updated = state.store.update(&id, input).await?;
    Ok(Json(PredictionEnvelope::updated(updated)))
}

/// DELETE /api/predictions/{id}
pub async fn delete_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PredictionEnvelope> {
    let deleted = state.store.delete(&id).await?;
    Ok(Json(PredictionEnvelope::deleted(deleted)))
}

/// GET /api/sports/{sport}/stats
///
/// 404 depends only on the snapshot, not on stored predictions.
pub async fn get_sport_stats(
    State(state): State<AppState>,
    Path(sport): Path<String>,
) -> ApiResult<SportStatsResponse> {
    let stats = state
        .stats
        .sport(&sport)
        .cloned()
        .ok_or_else(|| PrognosisError::SportNotFound { sport: sport.clone() })?;
    let recent_predictions = state.store.recent_for_sport(&sport, SPORT_RECENT_COUNT).await;

    debug!(sport = %sport, recent = recent_predictions.len(), "Sport stats served");
    Ok(Json(SportStatsResponse {
        sport,
        stats,
        recent_predictions,
    }))
}

/// GET /api/telegram/stats
pub async fn get_telegram_stats(State(state): State<AppState>) -> Json<TelegramDigest> {
    Json(TelegramDigest {
        stats_message: render_stats_message(&state.stats),
        recent_predictions: state.store.recent(DIGEST_RECENT_COUNT).await,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
