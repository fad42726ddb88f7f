use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::NormalizeError;
use super::numeric::number_from_value;
use super::payload::RawPayload;
use super::repair::{repair, repaired_fragments};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabStatus {
    High,
    Low,
    Normal,
    Unknown,
}

impl LabStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            "normal" => Self::Normal,
            _ => Self::Unknown,
        }
    }
}

/// One named measurement of one lab result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabParameter {
    pub parameter: String,
    /// `NaN` when the upstream value had no numeric content.
    pub value: f64,
    pub unit: String,
    pub normal_range: String,
    pub status: LabStatus,
    pub explanation: Option<String>,
    pub recommendation: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

fn first_str<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn lab_parameter(item: &Value, timestamp: OffsetDateTime) -> Option<LabParameter> {
    let parameter = first_str(item, &["parameter", "name", "test"])?.to_string();
    let value = item.get("value").map(number_from_value).unwrap_or(f64::NAN);
    let status = if value.is_nan() {
        LabStatus::Unknown
    } else {
        item.get("status")
            .and_then(Value::as_str)
            .map(LabStatus::parse)
            .unwrap_or(LabStatus::Unknown)
    };

    Some(LabParameter {
        parameter,
        value,
        unit: first_str(item, &["unit"]).unwrap_or_default().to_string(),
        normal_range: first_str(item, &["normal_range", "reference_range"])
            .unwrap_or_default()
            .to_string(),
        status,
        explanation: first_str(item, &["explanation"]).map(str::to_string),
        recommendation: first_str(item, &["recommendation"]).map(str::to_string),
        timestamp,
    })
}

/// Finds the measurement array in a decoded document: the document itself,
/// or an array nested under `analysis` (at most twice).
fn measurement_array(value: Value) -> Result<Vec<Value>, NormalizeError> {
    let mut node = value;
    for _ in 0..3 {
        node = match node {
            Value::Array(items) => return Ok(items),
            Value::Object(mut map) => match map.remove("analysis") {
                Some(inner) => inner,
                None => break,
            },
            _ => break,
        };
    }
    Err(NormalizeError::mapping("results_json"))
}

fn resolve_measurements(payload: RawPayload) -> Result<Vec<Value>, NormalizeError> {
    match payload {
        RawPayload::JsonObject(value) => measurement_array(value),
        RawPayload::JsonText(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => measurement_array(value),
            Err(e) => {
                debug!(error = %e, "results_json is not valid JSON; repairing");
                let doc = repair(&text)?;
                Ok(repaired_fragments(&doc).to_vec())
            }
        },
        RawPayload::Narrative(_) => Err(NormalizeError::mapping("results_json")),
    }
}

/// Normalizes the measurements of one lab result. Elements without a
/// parameter name are skipped; an error means the whole result is unusable.
pub fn normalize_lab_result(
    payload: RawPayload,
    created_at: OffsetDateTime,
) -> Result<Vec<LabParameter>, NormalizeError> {
    let items = resolve_measurements(payload)?;
    let total = items.len();
    let params: Vec<LabParameter> = items
        .iter()
        .filter_map(|item| lab_parameter(item, created_at))
        .collect();
    if params.len() < total {
        debug!(skipped = total - params.len(), "lab measurements without a parameter name");
    }
    Ok(params)
}

/// One lab result as handed over by the fetch layer.
#[derive(Debug, Clone)]
pub struct LabResultPayload {
    pub id: Uuid,
    pub payload: Option<RawPayload>,
    pub created_at: OffsetDateTime,
}

/// Normalizes every result of a batch, keeping input order. A result that
/// cannot be read is dropped and does not affect the others.
pub fn normalize_lab_results<I>(results: I) -> Vec<Vec<LabParameter>>
where
    I: IntoIterator<Item = LabResultPayload>,
{
    results
        .into_iter()
        .filter_map(|r| {
            let Some(payload) = r.payload else {
                warn!(lab_result_id = %r.id, "dropping lab result without results_json");
                return None;
            };
            normalize_lab_result(payload, r.created_at)
                .map_err(|e| warn!(error = %e, lab_result_id = %r.id, "dropping lab result"))
                .ok()
        })
        .collect()
}
