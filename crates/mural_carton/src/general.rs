//! General-purpose value helpers.
//!
//! Blueprints and the root data store are plain JSON, but the page language that
//! produces them follows loose scripting semantics. These helpers give the rest of
//! the workspace one place for those coercions.

use serde_json::Value;

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy, everything
/// else (including empty arrays and objects) is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a primitive value as display text.
///
/// Strings are returned without quotes, `null` becomes the empty string and
/// compound values fall back to their JSON encoding.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n.as_f64().unwrap_or_default()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format a float the way a script engine would print it: integral values lose
/// their fractional part.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Whether a string is a bare number such as `"10"`, `"-2"` or `"0.5"`.
pub fn is_numeric_like(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.parse::<f64>().is_ok_and(|n| n.is_finite())
}

/// Numeric view of a JSON value, accepting numeric-looking strings.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if is_numeric_like(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whether the value is a scalar (not an array or object).
#[inline]
pub fn is_primitive(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Follow a dot-delimited path through objects and arrays.
///
/// Array elements are addressed by decimal index. Empty segments are skipped, so
/// `"a..b"` and `"a.b"` address the same value.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| get_segment(current, segment))
}

/// Look up one path segment on an object or array.
pub fn get_segment<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Write `new_value` at a dot path, creating intermediate objects as needed.
///
/// Returns `false` when an intermediate segment exists but is not an object.
pub fn set_path(target: &mut Value, path: &str, new_value: Value) -> bool {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = target;
    for segment in parents {
        if current.is_null() {
            *current = Value::Object(Default::default());
        }
        let Value::Object(map) = current else {
            return false;
        };
        current = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }

    if current.is_null() {
        *current = Value::Object(Default::default());
    }
    match current {
        Value::Object(map) => {
            map.insert((*last).to_string(), new_value);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(5)), "5");
        assert_eq!(value_to_string(&json!(2.5)), "2.5");
        assert_eq!(value_to_string(&json!("hi")), "hi");
        assert_eq!(value_to_string(&json!(null)), "");
    }

    #[test]
    fn test_numeric_like() {
        assert!(is_numeric_like("10"));
        assert!(is_numeric_like("0.25"));
        assert!(!is_numeric_like("10px"));
        assert!(!is_numeric_like(""));
        assert!(!is_numeric_like("NaN"));
    }

    #[test]
    fn test_get_path() {
        let data = json!({ "a": { "list": [{ "name": "x" }] } });
        assert_eq!(get_path(&data, "a.list.0.name"), Some(&json!("x")));
        assert_eq!(get_path(&data, "a.missing"), None);
        assert_eq!(get_path(&data, "a.list.3"), None);
    }

    #[test]
    fn test_set_path_creates_parents() {
        let mut data = json!({});
        assert!(set_path(&mut data, "form.user.name", json!("ann")));
        assert_eq!(data, json!({ "form": { "user": { "name": "ann" } } }));

        let mut blocked = json!({ "form": 3 });
        assert!(!set_path(&mut blocked, "form.name", json!("ann")));
    }
}
