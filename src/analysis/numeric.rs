use serde_json::Value;

/// Pull a number out of a string that mixes digits with units or symbols.
///
/// `"289 mcg/dL"` yields `289.0`. Everything except digits, `.` and `-` is
/// dropped, then the longest numeric prefix of what is left is parsed, so
/// a trailing period or a range (`"4.5-5.5"`) keeps its first number. A
/// minus sign only counts at the very start. Strings without numeric
/// content yield `NaN`, which callers treat as "unknown".
pub fn extract_number(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    numeric_prefix(&kept).parse::<f64>().unwrap_or(f64::NAN)
}

fn numeric_prefix(kept: &str) -> &str {
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in kept.char_indices() {
        match c {
            '-' if i == 0 => {}
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    &kept[..end]
}

/// Same as [`extract_number`] for a JSON node that may already be numeric.
pub fn number_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => extract_number(s),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_units() {
        assert_eq!(extract_number("289 mcg/dL"), 289.0);
        assert_eq!(extract_number("5.4 mmol/L"), 5.4);
        assert_eq!(extract_number("<0.5"), 0.5);
    }

    #[test]
    fn keeps_leading_minus_only() {
        assert_eq!(extract_number("-3.2 SD"), -3.2);
        assert_eq!(extract_number("5- mg"), 5.0);
    }

    #[test]
    fn non_numeric_is_nan() {
        assert!(extract_number("n/a").is_nan());
        assert!(extract_number("").is_nan());
        assert!(extract_number("-").is_nan());
    }

    #[test]
    fn stray_periods_and_ranges_keep_the_leading_number() {
        assert_eq!(extract_number("5.4 mmol/L."), 5.4);
        assert_eq!(extract_number("12 mg. (fasting)"), 12.0);
        assert_eq!(extract_number("4.5-5.5"), 4.5);
    }

    #[test]
    fn value_nodes() {
        assert_eq!(number_from_value(&json!(42)), 42.0);
        assert_eq!(number_from_value(&json!("12 g")), 12.0);
        assert!(number_from_value(&json!(null)).is_nan());
        assert!(number_from_value(&json!({"amount": 3})).is_nan());
    }
}
