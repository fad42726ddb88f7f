use lazy_static::lazy_static;
use regex::Regex;

use super::error::NormalizeError;
use super::grade::Grade;
use super::meal::Pillar;

/// Meal fields recovered from legacy prose. Every field is optional; a
/// missing one keeps the canonical default downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeFields {
    pub name: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub pillar_grades: Vec<(Pillar, Grade)>,
}

/// Pulls meal fields out of free text that never used JSON.
pub trait NarrativeExtractor: Send + Sync {
    fn extract(&self, text: &str) -> NarrativeFields;
}

/// Pattern-matching extractor for the legacy report layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexNarrativeExtractor;

lazy_static! {
    static ref NAME_RE: Regex =
        Regex::new(r"(?i)meal (?:comprises|consists of|includes)\s+([^.]+)\.").unwrap();
    static ref CALORIES_RE: Regex = range_after(r"Total Estimated Calories");
    static ref PROTEIN_RE: Regex = grams_range_after(r"Protein");
    static ref CARBS_RE: Regex = grams_range_after(r"Carbohydrates|Carbs");
    static ref FAT_RE: Regex = grams_range_at_line_start(r"(?:Total\s+)?Fats?");
    static ref PILLAR_RES: Vec<(Pillar, Regex)> = Pillar::ALL
        .iter()
        .map(|&p| (p, pillar_grade_after(p.narrative_label())))
        .collect();
}

fn range_after(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?i:{label})[^0-9\n]*(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)"
    ))
    .unwrap()
}

fn grams_range_after(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?i:\b(?:{label}))\s*:?[^0-9\n]*(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)\s*(?i:g|grams)\b"
    ))
    .unwrap()
}

// "Saturated Fat: 3-5 g" must not be read as the fat total
fn grams_range_at_line_start(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?m)^[ \t\-*]*(?i:{label})\s*:?[^0-9\n]*(\d+(?:\.\d+)?)\s*[-–]\s*(\d+(?:\.\d+)?)\s*(?i:g|grams)\b"
    ))
    .unwrap()
}

fn pillar_grade_after(label: &str) -> Regex {
    Regex::new(&format!(r"(?i:{label})\s*:\s*\**\s*([A-F])\b")).unwrap()
}

fn range_midpoint(re: &Regex, text: &str, field: &'static str) -> Result<f64, NormalizeError> {
    let caps = re
        .captures(text)
        .ok_or(NormalizeError::ExtractionMiss { field })?;
    let min: f64 = caps[1].parse().map_err(|_| NormalizeError::ExtractionMiss { field })?;
    let max: f64 = caps[2].parse().map_err(|_| NormalizeError::ExtractionMiss { field })?;
    Ok(((min + max) / 2.0).round())
}

fn meal_name(text: &str) -> Result<String, NormalizeError> {
    let miss = NormalizeError::ExtractionMiss { field: "name" };
    let caps = NAME_RE.captures(text).ok_or_else(|| miss.clone())?;
    capitalize(caps[1].trim()).ok_or(miss)
}

fn capitalize(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

fn absorb<T>(result: Result<T, NormalizeError>) -> Option<T> {
    result
        .map_err(|e| tracing::debug!(error = %e, "narrative field left at default"))
        .ok()
}

impl NarrativeExtractor for RegexNarrativeExtractor {
    fn extract(&self, text: &str) -> NarrativeFields {
        let pillar_grades = PILLAR_RES
            .iter()
            .filter_map(|(pillar, re)| {
                let grade = re.captures(text).and_then(|c| Grade::parse(&c[1]));
                if grade.is_none() {
                    tracing::debug!(pillar = pillar.key(), "narrative pillar grade not found");
                }
                grade.map(|g| (*pillar, g))
            })
            .collect();

        NarrativeFields {
            name: absorb(meal_name(text)),
            calories: absorb(range_midpoint(&CALORIES_RE, text, "calories")),
            protein: absorb(range_midpoint(&PROTEIN_RE, text, "protein")),
            carbs: absorb(range_midpoint(&CARBS_RE, text, "carbs")),
            fat: absorb(range_midpoint(&FAT_RE, text, "fat")),
            pillar_grades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_REPORT: &str = "\
This meal consists of grilled salmon with quinoa and steamed broccoli.

Total Estimated Calories: 400-600 kcal

Macronutrients:
- Protein: 30-40 grams
- Carbohydrates: 45-55 grams
- Fats: 15-21 grams

Longevity Pillars:
Cardiovascular Health: A
Cancer Prevention: B
Cognitive Health: **A**
Metabolic Health: B
Musculoskeletal Health: C
";

    #[test]
    fn extracts_full_legacy_report() {
        let fields = RegexNarrativeExtractor.extract(LEGACY_REPORT);
        assert_eq!(
            fields.name.as_deref(),
            Some("Grilled salmon with quinoa and steamed broccoli")
        );
        assert_eq!(fields.calories, Some(500.0));
        assert_eq!(fields.protein, Some(35.0));
        assert_eq!(fields.carbs, Some(50.0));
        assert_eq!(fields.fat, Some(18.0));
        assert_eq!(
            fields.pillar_grades,
            vec![
                (Pillar::Cardiovascular, Grade::A),
                (Pillar::Cancer, Grade::B),
                (Pillar::Cognitive, Grade::A),
                (Pillar::Metabolic, Grade::B),
                (Pillar::Musculoskeletal, Grade::C),
            ]
        );
    }

    #[test]
    fn calories_alone() {
        let fields = RegexNarrativeExtractor.extract("Total Estimated Calories: 400-600");
        assert_eq!(fields.calories, Some(500.0));
        assert_eq!(fields.name, None);
        assert!(fields.pillar_grades.is_empty());
    }

    #[test]
    fn midpoint_is_rounded() {
        let fields = RegexNarrativeExtractor.extract("Total Estimated Calories - 301-400");
        assert_eq!(fields.calories, Some(351.0));
    }

    #[test]
    fn prose_without_patterns_yields_nothing() {
        let fields = RegexNarrativeExtractor.extract("Looks tasty! {not json either}");
        assert_eq!(fields, NarrativeFields::default());
    }

    #[test]
    fn saturated_fat_line_is_not_the_fat_total() {
        let fields = RegexNarrativeExtractor
            .extract("Macronutrients:\n- Saturated Fat: 3-5 grams\n- Fats: 15-21 grams\n");
        assert_eq!(fields.fat, Some(18.0));
        let fields = RegexNarrativeExtractor.extract("  * Total Fat: 10-12 g");
        assert_eq!(fields.fat, Some(11.0));
        let fields = RegexNarrativeExtractor.extract("Saturated Fat: 3-5 grams");
        assert_eq!(fields.fat, None);
    }

    #[test]
    fn lowercase_letter_is_not_a_grade() {
        let fields = RegexNarrativeExtractor.extract("Metabolic Health: b-ish");
        assert!(fields.pillar_grades.is_empty());
    }

    #[test]
    fn alternative_name_phrasings() {
        let a = RegexNarrativeExtractor.extract("The meal comprises eggs and toast. More text.");
        assert_eq!(a.name.as_deref(), Some("Eggs and toast"));
        let b = RegexNarrativeExtractor.extract("Your meal includes a green salad.");
        assert_eq!(b.name.as_deref(), Some("A green salad"));
    }
}
