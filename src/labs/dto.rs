use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::{LabParameter, LabSeries, LabStatus};

/// Chart data for one lab parameter plus its current reading.
#[derive(Debug, Serialize)]
pub struct LabSeriesView {
    pub parameter: String,
    pub unit: String,
    /// `null` when the latest value had no numeric content.
    pub current_value: Option<f64>,
    pub current_status: LabStatus,
    pub points: Vec<LabParameter>,
}

impl From<LabSeries> for LabSeriesView {
    fn from(series: LabSeries) -> Self {
        let current = series.current();
        let current_value = current.map(|p| p.value).filter(|v| v.is_finite());
        let unit = current.map(|p| p.unit.clone()).unwrap_or_default();
        let current_status = series.current_status();
        Self {
            parameter: series.parameter,
            unit,
            current_value,
            current_status,
            points: series.points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LabSeriesResponse {
    pub series: BTreeMap<String, LabSeriesView>,
}
