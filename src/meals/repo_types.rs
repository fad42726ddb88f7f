use serde::Deserialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::RawPayload;

/// A meal as stored by the upload pipeline, with the analysis service's
/// raw output untouched.
#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct MealRecord {
    pub id: Uuid,
    #[serde(default)]
    pub meal_image_url: Option<String>,
    /// Object, JSON-in-a-string, or legacy prose, depending on which
    /// version of the analysis service produced it.
    #[serde(default)]
    pub meal_output: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl MealRecord {
    pub fn payload(&self) -> Option<RawPayload> {
        self.meal_output.clone().and_then(RawPayload::from_stored)
    }
}
