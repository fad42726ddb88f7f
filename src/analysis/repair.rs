use serde_json::Value;
use tracing::debug;

use super::error::NormalizeError;

/// Best-effort repair of a string that should have been a JSON array of
/// objects but may use single quotes or be cut off mid-object.
///
/// The complete `{...}` fragments found at brace depth zero are wrapped as
/// `{"analysis":{"analysis":[...]}}`. A trailing truncated fragment is
/// discarded. Apostrophes inside genuine string values get turned into
/// double quotes too, so such payloads may still fail to parse.
pub fn repair(raw: &str) -> Result<Value, NormalizeError> {
    let quoted = raw.replace('\'', "\"");
    let fragments = balanced_fragments(&quoted);
    if fragments.is_empty() {
        return Err(NormalizeError::Repair("no complete object fragment".into()));
    }
    debug!(fragments = fragments.len(), "reassembling repaired payload");

    let document = format!(r#"{{"analysis":{{"analysis":[{}]}}}}"#, fragments.join(","));
    serde_json::from_str(&document).map_err(|e| NormalizeError::Repair(e.to_string()))
}

/// Fragments of a document produced by [`repair`].
pub fn repaired_fragments(document: &Value) -> &[Value] {
    document
        .pointer("/analysis/analysis")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn balanced_fragments(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    out.push(&s[start..=i]);
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_quotes_become_valid_json() {
        let doc = repair("[{'a':1},{'b':2}]").unwrap();
        assert_eq!(doc["analysis"]["analysis"], json!([{"a": 1}, {"b": 2}]));
    }

    #[test]
    fn truncated_tail_is_dropped() {
        let doc = repair("[{'a':1},{'b':2").unwrap();
        assert_eq!(repaired_fragments(&doc), &[json!({"a": 1})]);
    }

    #[test]
    fn nested_objects_stay_whole() {
        let doc = repair("{'meal_name': 'Oats', 'analysis': {'x': {'y': 1}}} trailing").unwrap();
        let frags = repaired_fragments(&doc);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0]["analysis"]["x"]["y"], json!(1));
    }

    #[test]
    fn stray_closing_brace_is_ignored() {
        let doc = repair("}} {'a': 1}").unwrap();
        assert_eq!(repaired_fragments(&doc), &[json!({"a": 1})]);
    }

    #[test]
    fn no_fragments_is_a_failure() {
        assert!(matches!(repair("[1, 2, 3"), Err(NormalizeError::Repair(_))));
        assert!(matches!(repair("plain prose"), Err(NormalizeError::Repair(_))));
    }

    #[test]
    fn unparseable_fragment_is_a_failure() {
        // the apostrophe in the value breaks quoting
        let err = repair("[{'note': 'patient's result'}]").unwrap_err();
        assert!(matches!(err, NormalizeError::Repair(_)));
    }
}
