use thiserror::Error;

/// Failures raised while normalizing an upstream analysis payload.
///
/// None of these reach an HTTP caller: they are absorbed where they occur,
/// either by keeping a field's default or by dropping a single record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("could not repair payload: {0}")]
    Repair(String),

    #[error("missing or mistyped node at `{path}`")]
    Mapping { path: String },

    #[error("no match for `{field}` in narrative text")]
    ExtractionMiss { field: &'static str },
}

impl NormalizeError {
    pub fn mapping(path: impl Into<String>) -> Self {
        Self::Mapping { path: path.into() }
    }
}
