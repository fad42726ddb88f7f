use tracing::debug;

use super::dto::{LabSeriesResponse, LabSeriesView};
use super::repo_types::LabResultRecord;
use crate::analysis::{group_series, normalize_lab_results, LabResultPayload};

/// Normalizes chronologically ordered lab results and groups them per
/// parameter. Unreadable results are skipped.
pub fn build_series(records: Vec<LabResultRecord>) -> LabSeriesResponse {
    let total = records.len();
    let normalized = normalize_lab_results(records.into_iter().map(LabResultPayload::from));
    debug!(total, kept = normalized.len(), "lab results normalized");

    let series = group_series(normalized)
        .into_iter()
        .map(|(name, s)| (name, LabSeriesView::from(s)))
        .collect();
    LabSeriesResponse { series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LabStatus;
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn record(results: serde_json::Value, at: time::OffsetDateTime) -> LabResultRecord {
        LabResultRecord {
            id: Uuid::new_v4(),
            results_json: Some(results),
            created_at: at,
        }
    }

    #[test]
    fn three_glucose_readings_form_one_series() {
        let records = vec![
            record(
                json!([{"parameter": "Glucose", "value": "92 mg/dL", "unit": "mg/dL", "status": "normal"}]),
                datetime!(2024-01-10 09:00 UTC),
            ),
            record(
                json!("[{'parameter': 'Glucose', 'value': '101 mg/dL', 'unit': 'mg/dL', 'status': 'high'}]"),
                datetime!(2024-02-10 09:00 UTC),
            ),
            record(
                json!(r#"[{"parameter": "Glucose", "value": 97, "unit": "mg/dL", "status": "Normal"}]"#),
                datetime!(2024-03-10 09:00 UTC),
            ),
            record(json!("nonsense"), datetime!(2024-03-11 09:00 UTC)),
        ];
        let response = build_series(records);
        let glucose = &response.series["Glucose"];
        assert_eq!(glucose.points.len(), 3);
        assert_eq!(glucose.current_status, LabStatus::Normal);
        assert_eq!(glucose.current_value, Some(97.0));
        assert_eq!(glucose.unit, "mg/dL");
    }

    #[test]
    fn unknown_latest_value_has_no_current_value() {
        let response = build_series(vec![record(
            json!([{"parameter": "CRP", "value": "pending", "status": "high"}]),
            datetime!(2024-01-10 09:00 UTC),
        )]);
        let crp = &response.series["CRP"];
        assert_eq!(crp.current_value, None);
        assert_eq!(crp.current_status, LabStatus::Unknown);
    }
}
