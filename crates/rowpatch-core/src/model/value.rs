//! Cell value comparison

use serde_json::Value;

/// Whether two cell values count as the same for diff tracking
///
/// `null` and the empty string are interchangeable: grid editors commonly
/// turn a cleared cell into `""` even when the database value is `NULL`.
pub fn values_equivalent(a: &Value, b: &Value) -> bool {
    is_blank(a) && is_blank(b) || a == b
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_empty_string_are_equivalent() {
        assert!(values_equivalent(&Value::Null, &json!("")));
        assert!(values_equivalent(&json!(""), &Value::Null));
        assert!(values_equivalent(&Value::Null, &Value::Null));
    }

    #[test]
    fn test_distinct_values() {
        assert!(!values_equivalent(&json!("a"), &Value::Null));
        assert!(!values_equivalent(&json!(0), &Value::Null));
        assert!(!values_equivalent(&json!(false), &json!("")));
        assert!(!values_equivalent(&json!(1), &json!("1")));
    }

    #[test]
    fn test_structured_values_compare_deeply() {
        assert!(values_equivalent(&json!({"a": [1, 2]}), &json!({"a": [1, 2]})));
        assert!(!values_equivalent(&json!({"a": [1, 2]}), &json!({"a": [2, 1]})));
    }
}
