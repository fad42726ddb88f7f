use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::NormalizeError;
use super::grade::{self, Grade};
use super::narrative::{NarrativeExtractor, NarrativeFields};
use super::numeric::number_from_value;
use super::payload::RawPayload;
use super::repair::{repair, repaired_fragments};

/// The five health-impact categories every meal is graded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Cardiovascular,
    Cancer,
    Cognitive,
    Metabolic,
    Musculoskeletal,
}

impl Pillar {
    pub const ALL: [Pillar; 5] = [
        Pillar::Cardiovascular,
        Pillar::Cancer,
        Pillar::Cognitive,
        Pillar::Metabolic,
        Pillar::Musculoskeletal,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Pillar::Cardiovascular => "cardiovascular",
            Pillar::Cancer => "cancer",
            Pillar::Cognitive => "cognitive",
            Pillar::Metabolic => "metabolic",
            Pillar::Musculoskeletal => "musculoskeletal",
        }
    }

    /// Keys tried under `analysis.longevity_pillars`, first present wins.
    fn source_keys(self) -> &'static [&'static str] {
        match self {
            Pillar::Cardiovascular => &["cardiovascular_health", "cardiovascular"],
            Pillar::Cancer => &["cancer_prevention", "cancer"],
            Pillar::Cognitive => &["cognitive_health", "cognitive_function", "cognitive"],
            Pillar::Metabolic => &["metabolic_health", "metabolic"],
            Pillar::Musculoskeletal => &["musculoskeletal_health", "musculoskeletal"],
        }
    }

    /// Header used for the pillar in legacy prose reports (regex syntax).
    pub(crate) fn narrative_label(self) -> &'static str {
        match self {
            Pillar::Cardiovascular => r"Cardiovascular(?: Health)?",
            Pillar::Cancer => r"Cancer(?: Prevention)?",
            Pillar::Cognitive => r"Cognitive(?: Health| Function)?",
            Pillar::Metabolic => r"Metabolic(?: Health)?",
            Pillar::Musculoskeletal => r"Musculoskeletal(?: Health)?",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Macros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Micronutrient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// Canonical, fully defaulted view of one meal's analysis.
///
/// Built once per upstream meal record and never modified afterwards;
/// a fresh fetch rebuilds it from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAnalysis {
    name: String,
    calories: f64,
    macros: Macros,
    pillar_grades: BTreeMap<Pillar, Grade>,
    pillar_comments: BTreeMap<Pillar, String>,
    micronutrients: Vec<Micronutrient>,
    health_benefits: Vec<String>,
    health_concerns: Vec<String>,
    recommendations: Vec<String>,
    overall_assessment: String,
    overall_grade: Grade,
}

impl MealAnalysis {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn calories(&self) -> f64 {
        self.calories
    }
    pub fn macros(&self) -> Macros {
        self.macros
    }
    pub fn pillar_grade(&self, pillar: Pillar) -> Grade {
        self.pillar_grades.get(&pillar).copied().unwrap_or_default()
    }
    pub fn pillar_comment(&self, pillar: Pillar) -> &str {
        self.pillar_comments.get(&pillar).map(String::as_str).unwrap_or("")
    }
    pub fn micronutrients(&self) -> &[Micronutrient] {
        &self.micronutrients
    }
    pub fn health_benefits(&self) -> &[String] {
        &self.health_benefits
    }
    pub fn health_concerns(&self) -> &[String] {
        &self.health_concerns
    }
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }
    pub fn overall_assessment(&self) -> &str {
        &self.overall_assessment
    }
    pub fn overall_grade(&self) -> Grade {
        self.overall_grade
    }
}

/// Blank record every mapping path starts from. Mapping code only
/// overwrites the fields it could confirm; `finish` fills the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MealDraft {
    name: Option<String>,
    calories: Option<f64>,
    macros: Macros,
    pillar_grades: BTreeMap<Pillar, Grade>,
    pillar_comments: BTreeMap<Pillar, String>,
    micronutrients: Vec<Micronutrient>,
    health_benefits: Vec<String>,
    health_concerns: Vec<String>,
    recommendations: Vec<String>,
    overall_assessment: String,
}

impl MealDraft {
    pub(crate) fn blank() -> Self {
        Self::default()
    }

    pub(crate) fn finish(self) -> MealAnalysis {
        // only grades that were actually reported count towards the overall
        let overall_grade = grade::aggregate(self.pillar_grades.values().copied().map(Some));
        let pillar_grades = Pillar::ALL
            .iter()
            .map(|p| (*p, self.pillar_grades.get(p).copied().unwrap_or_default()))
            .collect();
        let mut pillar_comments = self.pillar_comments;
        for p in Pillar::ALL {
            pillar_comments.entry(p).or_default();
        }

        MealAnalysis {
            name: self.name.unwrap_or_else(|| "Meal".to_string()),
            calories: self.calories.unwrap_or(0.0),
            macros: self.macros,
            pillar_grades,
            pillar_comments,
            micronutrients: self.micronutrients,
            health_benefits: self.health_benefits,
            health_concerns: self.health_concerns,
            recommendations: self.recommendations,
            overall_assessment: self.overall_assessment,
            overall_grade,
        }
    }

    /// Whether any mapping rule overwrote a default.
    fn confirmed_any(&self) -> bool {
        *self != Self::blank()
    }

    fn apply_narrative(&mut self, fields: NarrativeFields) {
        if let Some(name) = fields.name {
            self.name = Some(name);
        }
        if let Some(calories) = fields.calories {
            self.calories = Some(calories);
        }
        if let Some(protein) = fields.protein {
            self.macros.protein = protein;
        }
        if let Some(carbs) = fields.carbs {
            self.macros.carbs = carbs;
        }
        if let Some(fat) = fields.fat {
            self.macros.fat = fat;
        }
        self.pillar_grades.extend(fields.pillar_grades);
    }

    fn apply_json(&mut self, root: &Value) {
        if let Some(name) = absorb(text_at(root, "/meal_name")) {
            self.name = Some(name);
        }
        if let Some(calories) = absorb(caloric_midpoint(root)) {
            self.calories = Some(calories);
        }
        if let Some(v) = absorb(amount_at(root, "/analysis/macronutrients/protein/amount")) {
            self.macros.protein = v;
        }
        if let Some(v) = absorb(amount_at(root, "/analysis/macronutrients/carbohydrates/amount")) {
            self.macros.carbs = v;
        }
        if let Some(v) = absorb(amount_at(root, "/analysis/macronutrients/fats/amount")) {
            self.macros.fat = v;
        }

        for pillar in Pillar::ALL {
            let Some(node) = absorb(pillar_node(root, pillar)) else {
                continue;
            };
            if let Some(grade) = node.get("grade").and_then(Value::as_str).and_then(Grade::parse) {
                self.pillar_grades.insert(pillar, grade);
            }
            if let Some(notes) = node.get("notes").and_then(Value::as_str) {
                self.pillar_comments.insert(pillar, notes.to_string());
            }
        }

        if let Some(items) = absorb(array_at(root, "/analysis/micronutrients")) {
            self.micronutrients = items.iter().filter_map(micronutrient).collect();
        }

        let benefits = array_at(root, "/analysis/health_benefits")
            .or_else(|_| array_at(root, "/health/benefits"));
        if let Some(items) = absorb(benefits) {
            self.health_benefits = strings(items);
        }
        if let Some(items) = absorb(array_at(root, "/health/concerns")) {
            self.health_concerns = strings(items);
        }
        if let Some(items) = absorb(array_at(root, "/recommendations")) {
            self.recommendations = strings(items);
        }
        if let Some(text) = absorb(text_at(root, "/overall_nutritional_assessment")) {
            self.overall_assessment = text;
        }
    }
}

fn absorb<T>(result: Result<T, NormalizeError>) -> Option<T> {
    result
        .map_err(|e| debug!(error = %e, "meal field left at default"))
        .ok()
}

fn node_at<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, NormalizeError> {
    root.pointer(pointer)
        .filter(|v| !v.is_null())
        .ok_or_else(|| NormalizeError::mapping(pointer))
}

fn text_at(root: &Value, pointer: &str) -> Result<String, NormalizeError> {
    node_at(root, pointer)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| NormalizeError::mapping(pointer))
}

fn amount_at(root: &Value, pointer: &str) -> Result<f64, NormalizeError> {
    let n = number_from_value(node_at(root, pointer)?);
    if n.is_finite() {
        Ok(n)
    } else {
        Err(NormalizeError::mapping(pointer))
    }
}

fn array_at<'a>(root: &'a Value, pointer: &str) -> Result<&'a Vec<Value>, NormalizeError> {
    node_at(root, pointer)?
        .as_array()
        .ok_or_else(|| NormalizeError::mapping(pointer))
}

fn caloric_midpoint(root: &Value) -> Result<f64, NormalizeError> {
    let min = amount_at(root, "/analysis/estimated_caloric_content/min")?;
    let max = amount_at(root, "/analysis/estimated_caloric_content/max")?;
    Ok(((min + max) / 2.0).round())
}

fn pillar_node(root: &Value, pillar: Pillar) -> Result<&Value, NormalizeError> {
    let pillars = node_at(root, "/analysis/longevity_pillars")?;
    pillar
        .source_keys()
        .iter()
        .find_map(|k| pillars.get(*k).filter(|v| v.is_object()))
        .ok_or_else(|| NormalizeError::mapping(format!("/analysis/longevity_pillars/{}", pillar.key())))
}

fn micronutrient(item: &Value) -> Option<Micronutrient> {
    let name = item.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let amount = match item.get("amount") {
        Some(Value::String(s)) => s.clone(),
        // f64 Display drops the fraction of whole values: 8.0 -> "8"
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        _ => String::new(),
    };
    let unit = item
        .get("unit")
        .and_then(Value::as_str)
        .filter(|u| !u.trim().is_empty())
        .unwrap_or("mg")
        .to_string();
    Some(Micronutrient {
        name: name.to_string(),
        amount,
        unit,
    })
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Normalizes one meal payload into its canonical record.
///
/// JSON text is parsed strictly first, then repaired, and only then read
/// as legacy prose. Returns an error only when the payload is a decoded
/// document that is not an object, which leaves nothing to map.
pub fn normalize_meal(
    payload: RawPayload,
    narrative: &dyn NarrativeExtractor,
) -> Result<MealAnalysis, NormalizeError> {
    let mut draft = MealDraft::blank();
    match payload {
        RawPayload::JsonObject(value) => {
            if !value.is_object() {
                return Err(NormalizeError::mapping("meal_output"));
            }
            draft.apply_json(&value);
        }
        RawPayload::JsonText(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) if value.is_object() => draft.apply_json(&value),
            _ => {
                // prose may carry a stray `{...}`; a fragment only counts if
                // it maps to at least one meal field
                let repaired = repair(&text)
                    .map_err(|e| debug!(error = %e, "meal payload not repairable"))
                    .ok()
                    .and_then(|doc| {
                        repaired_fragments(&doc).iter().find_map(|fragment| {
                            let mut candidate = MealDraft::blank();
                            candidate.apply_json(fragment);
                            candidate.confirmed_any().then_some(candidate)
                        })
                    });
                match repaired {
                    Some(candidate) => draft = candidate,
                    None => return normalize_meal(RawPayload::Narrative(text), narrative),
                }
            }
        },
        RawPayload::Narrative(text) => draft.apply_narrative(narrative.extract(&text)),
    }
    Ok(draft.finish())
}
