use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::{MealAnalysisView, Pagination};
use super::repo_types::MealRecord;
use super::services::{analyze_meals, summarize};
use crate::analysis::{MealSummary, RegexNarrativeExtractor};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:user_id/meals/analyses", get(list_meal_analyses))
        .route("/users/:user_id/meals/summary", get(get_meal_summary))
}

pub fn normalize_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/analyses", post(normalize_meal_records))
        .route("/meals/summary", post(summarize_meal_records))
}

async fn load_page(
    state: &AppState,
    user_id: Uuid,
    p: &Pagination,
) -> Result<Vec<MealAnalysisView>, (StatusCode, String)> {
    let limit = state.config.paging.limit(p.limit);
    let records = state
        .store
        .list_meals(user_id, limit, p.offset.max(0))
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "list meals failed");
            internal(e)
        })?;
    Ok(analyze_meals(records, &RegexNarrativeExtractor))
}

#[instrument(skip(state))]
pub async fn list_meal_analyses(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<MealAnalysisView>>, (StatusCode, String)> {
    Ok(Json(load_page(&state, user_id, &p).await?))
}

#[instrument(skip(state))]
pub async fn get_meal_summary(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(p): Query<Pagination>,
) -> Result<Json<MealSummary>, (StatusCode, String)> {
    let views = load_page(&state, user_id, &p).await?;
    Ok(Json(summarize(&views)))
}

/// POST /meals/analyses with a JSON array of raw meal records.
#[instrument(skip_all)]
pub async fn normalize_meal_records(
    Json(records): Json<Vec<MealRecord>>,
) -> Json<Vec<MealAnalysisView>> {
    Json(analyze_meals(records, &RegexNarrativeExtractor))
}

#[instrument(skip_all)]
pub async fn summarize_meal_records(Json(records): Json<Vec<MealRecord>>) -> Json<MealSummary> {
    Json(summarize(&analyze_meals(records, &RegexNarrativeExtractor)))
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
