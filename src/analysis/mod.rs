//! Normalization of upstream AI analysis payloads into canonical records.
//!
//! Everything here is synchronous and pure. Failures are absorbed at the
//! smallest granularity (one field or one record) and never reach callers.

pub mod error;
pub mod grade;
pub mod lab;
pub mod meal;
pub mod narrative;
pub mod numeric;
pub mod payload;
pub mod repair;
pub mod series;
pub mod summary;

pub use lab::{normalize_lab_results, LabParameter, LabResultPayload, LabStatus};
pub use meal::{normalize_meal, MealAnalysis};
pub use narrative::{NarrativeExtractor, RegexNarrativeExtractor};
pub use payload::RawPayload;
pub use series::{group_series, LabSeries};
pub use summary::{summarize_meals, MealSummary};
