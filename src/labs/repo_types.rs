use serde::Deserialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::analysis::{LabResultPayload, RawPayload};

#[derive(Debug, Clone, Deserialize, FromRow)]
pub struct LabResultRecord {
    pub id: Uuid,
    /// Native array, JSON string, or a single-quoted/truncated string.
    #[serde(default)]
    pub results_json: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<LabResultRecord> for LabResultPayload {
    fn from(r: LabResultRecord) -> Self {
        Self {
            id: r.id,
            payload: r.results_json.and_then(RawPayload::from_stored),
            created_at: r.created_at,
        }
    }
}
