use serde::Serialize;

use super::grade::{self, Grade};
use super::meal::{Macros, MealAnalysis};

/// Header-card figures over a page of meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealSummary {
    pub meal_count: usize,
    pub average_calories: f64,
    pub total_macros: Macros,
    pub overall_grade: Grade,
}

pub fn summarize_meals(meals: &[MealAnalysis]) -> MealSummary {
    let total_macros = meals.iter().fold(Macros::default(), |acc, m| {
        let x = m.macros();
        Macros {
            protein: acc.protein + x.protein,
            carbs: acc.carbs + x.carbs,
            fat: acc.fat + x.fat,
        }
    });
    let average_calories = if meals.is_empty() {
        0.0
    } else {
        (meals.iter().map(MealAnalysis::calories).sum::<f64>() / meals.len() as f64).round()
    };

    MealSummary {
        meal_count: meals.len(),
        average_calories,
        total_macros,
        overall_grade: grade::aggregate(meals.iter().map(|m| Some(m.overall_grade()))),
    }
}
