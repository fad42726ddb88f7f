use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::MealAnalysis;

/// One meal card on the dashboard.
#[derive(Debug, Serialize)]
pub struct MealAnalysisView {
    pub id: Uuid,
    pub meal_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub analysis: MealAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}
