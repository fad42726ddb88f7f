use tracing::{debug, warn};

use super::dto::MealAnalysisView;
use super::repo_types::MealRecord;
use crate::analysis::{normalize_meal, summarize_meals, MealSummary, NarrativeExtractor};

/// Normalizes a page of stored meals. Each record is handled on its own; a
/// record that cannot be mapped is left out and the rest are returned.
pub fn analyze_meals(
    records: Vec<MealRecord>,
    narrative: &dyn NarrativeExtractor,
) -> Vec<MealAnalysisView> {
    let total = records.len();
    let views: Vec<MealAnalysisView> = records
        .into_iter()
        .filter_map(|record| {
            let Some(payload) = record.payload() else {
                warn!(meal_id = %record.id, "meal has no analysis output yet");
                return None;
            };
            let kind = payload.kind();
            match normalize_meal(payload, narrative) {
                Ok(analysis) => Some(MealAnalysisView {
                    id: record.id,
                    meal_image_url: record.meal_image_url,
                    created_at: record.created_at,
                    analysis,
                }),
                Err(e) => {
                    warn!(meal_id = %record.id, kind, error = %e, "dropping meal analysis");
                    None
                }
            }
        })
        .collect();
    debug!(total, kept = views.len(), "meal analyses normalized");
    views
}

pub fn summarize(views: &[MealAnalysisView]) -> MealSummary {
    let meals: Vec<_> = views.iter().map(|v| v.analysis.clone()).collect();
    summarize_meals(&meals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::grade::Grade;
    use crate::analysis::RegexNarrativeExtractor;
    use serde_json::json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn record(output: Option<serde_json::Value>) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            meal_image_url: Some("https://cdn.local/meal.jpg".into()),
            meal_output: output,
            created_at: datetime!(2024-06-01 12:00 UTC),
        }
    }

    #[test]
    fn mixed_formats_in_one_page() {
        let records = vec![
            record(Some(json!({"meal_name": "Poke", "analysis": {
                "longevity_pillars": {"cardiovascular_health": {"grade": "B"}}
            }}))),
            record(Some(json!("{'meal_name': 'Ramen'}"))),
            record(Some(json!("The meal consists of two tacos. Total Estimated Calories: 500-700"))),
            record(None),
            record(Some(json!(17))),
        ];
        let views = analyze_meals(records, &RegexNarrativeExtractor);
        let names: Vec<_> = views.iter().map(|v| v.analysis.name()).collect();
        assert_eq!(names, vec!["Poke", "Ramen", "Two tacos"]);
        assert_eq!(views[2].analysis.calories(), 600.0);
        assert_eq!(views[0].meal_image_url.as_deref(), Some("https://cdn.local/meal.jpg"));
    }

    #[test]
    fn summary_over_views() {
        let views = analyze_meals(
            vec![record(Some(json!({"analysis": {
                "longevity_pillars": {"metabolic": {"grade": "D"}}
            }})))],
            &RegexNarrativeExtractor,
        );
        let summary = summarize(&views);
        assert_eq!(summary.meal_count, 1);
        assert_eq!(summary.overall_grade, Grade::D);
    }
}
