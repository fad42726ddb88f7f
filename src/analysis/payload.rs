use serde_json::Value;

/// An upstream analysis payload, tagged by how it was received.
///
/// The tag comes from the source (a JSON string column vs. an already
/// decoded object), never from inspecting the text, so a JSON-looking
/// string and prose that happens to contain braces are not confused.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// A string expected to hold JSON.
    JsonText(String),
    /// An already decoded JSON document.
    JsonObject(Value),
    /// Legacy free-text output with no machine-readable structure.
    Narrative(String),
}

impl RawPayload {
    /// Tags a stored `meal_output` / `results_json` node. Strings are kept
    /// as text to be parsed later; anything else is an already decoded
    /// document. `null` means there is nothing to normalize.
    pub fn from_stored(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::JsonText(s)),
            other => Some(Self::JsonObject(other)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::JsonText(_) => "json-text",
            Self::JsonObject(_) => "json-object",
            Self::Narrative(_) => "narrative",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stored_values_are_tagged_by_json_type() {
        assert_eq!(RawPayload::from_stored(json!(null)), None);
        assert_eq!(
            RawPayload::from_stored(json!("{'a': 1}")),
            Some(RawPayload::JsonText("{'a': 1}".into()))
        );
        let obj = RawPayload::from_stored(json!({"meal_name": "Soup"})).unwrap();
        assert_eq!(obj.kind(), "json-object");
    }
}
