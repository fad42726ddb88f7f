use std::collections::BTreeMap;

use serde::Serialize;

use super::lab::{LabParameter, LabStatus};

/// Successive measurements of one lab parameter, in the order the results
/// were supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabSeries {
    pub parameter: String,
    pub points: Vec<LabParameter>,
}

impl LabSeries {
    /// The most recent point. Recency is the caller's ordering; nothing is
    /// re-sorted by timestamp.
    pub fn current(&self) -> Option<&LabParameter> {
        self.points.last()
    }

    pub fn current_status(&self) -> LabStatus {
        self.current().map_or(LabStatus::Unknown, |p| p.status)
    }
}

/// Groups chronologically ordered results into one series per parameter.
/// Parameter names match exactly, case included.
pub fn group_series<I>(results: I) -> BTreeMap<String, LabSeries>
where
    I: IntoIterator<Item = Vec<LabParameter>>,
{
    let mut grouped: BTreeMap<String, LabSeries> = BTreeMap::new();
    for param in results.into_iter().flatten() {
        grouped
            .entry(param.parameter.clone())
            .or_insert_with(|| LabSeries {
                parameter: param.parameter.clone(),
                points: Vec::new(),
            })
            .points
            .push(param);
    }
    grouped
}
