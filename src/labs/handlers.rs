use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};
use uuid::Uuid;

use super::dto::LabSeriesResponse;
use super::repo_types::LabResultRecord;
use super::services::build_series;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id/labs/series", get(get_lab_series))
}

pub fn normalize_routes() -> Router<AppState> {
    Router::new().route("/labs/series", post(group_lab_records))
}

#[instrument(skip(state))]
pub async fn get_lab_series(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<LabSeriesResponse>, (StatusCode, String)> {
    let records = state.store.list_lab_results(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list lab results failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(build_series(records)))
}

/// POST /labs/series with lab results in chronological order; the body's
/// order decides which reading is current.
#[instrument(skip_all)]
pub async fn group_lab_records(
    Json(records): Json<Vec<LabResultRecord>>,
) -> Json<LabSeriesResponse> {
    Json(build_series(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use time::macros::datetime;

    #[tokio::test]
    async fn stored_results_are_grouped_oldest_first() {
        let newer = LabResultRecord {
            id: Uuid::new_v4(),
            results_json: Some(json!([{"parameter": "LDL", "value": 99, "status": "normal"}])),
            created_at: datetime!(2024-04-01 00:00 UTC),
        };
        let older = LabResultRecord {
            id: Uuid::new_v4(),
            results_json: Some(json!([{"parameter": "LDL", "value": 160, "status": "high"}])),
            created_at: datetime!(2024-01-01 00:00 UTC),
        };
        let state = AppState::with_store(MemoryStore {
            meals: vec![],
            lab_results: vec![newer, older],
        });
        let Json(response) = get_lab_series(State(state), Path(Uuid::new_v4()))
            .await
            .unwrap();
        let ldl = &response.series["LDL"];
        assert_eq!(ldl.points[0].value, 160.0);
        assert_eq!(ldl.current_value, Some(99.0));
    }

    #[tokio::test]
    async fn posted_body_order_is_trusted() {
        let records: Vec<LabResultRecord> = serde_json::from_value(json!([
            {"id": Uuid::new_v4(), "results_json": [{"parameter": "TSH", "value": "2.0", "status": "normal"}],
             "created_at": "2024-05-01T00:00:00Z"},
            {"id": Uuid::new_v4(), "results_json": "[{'parameter': 'TSH', 'value': '5.9', 'status': 'high'}",
             "created_at": "2024-01-01T00:00:00Z"}
        ]))
        .unwrap();
        let Json(response) = group_lab_records(Json(records)).await;
        let tsh = &response.series["TSH"];
        assert_eq!(tsh.points.len(), 2);
        assert_eq!(tsh.current_status, crate::analysis::LabStatus::High);

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["series"]["TSH"]["current_status"], json!("high"));
    }
}
