//! Axis and alignment keys.

use mural_relief::StyleMap;
use serde_json::Value;

fn set(out: &mut StyleMap, key: &str, value: &str) {
    out.insert(key.to_string(), value.to_string());
}

fn center_vertically(out: &mut StyleMap) {
    set(out, "display", "flex");
    set(out, "alignItems", "center");
}

/// `axis: horizontal | vertical`.
pub fn apply_axis(out: &mut StyleMap, value: &Value) {
    match value.as_str() {
        Some("horizontal") => {
            set(out, "display", "flex");
            set(out, "flexDirection", "row");
            set(out, "flexWrap", "nowrap");
        }
        Some("vertical") => {
            set(out, "display", "flex");
            set(out, "flexDirection", "column");
        }
        _ => tracing::debug!(?value, "unknown axis"),
    }
}

/// `align: centerX | centerY`.
pub fn apply_align(out: &mut StyleMap, value: &Value) {
    match value.as_str() {
        Some("centerX") => {
            set(out, "display", "flex");
            set(out, "justifyContent", "center");
        }
        Some("centerY") => center_vertically(out),
        _ => tracing::debug!(?value, "unknown align"),
    }
}

/// `textAlign` as a string or as `{ x, y }`.
pub fn apply_text_align(out: &mut StyleMap, value: &Value) {
    match value {
        Value::String(s) => horizontal_text_align(out, s),
        Value::Object(axes) => {
            if let Some(x) = axes.get("x").and_then(Value::as_str) {
                horizontal_text_align(out, x);
            }
            if let Some("center" | "centerY") = axes.get("y").and_then(Value::as_str) {
                center_vertically(out);
            }
        }
        _ => tracing::debug!(?value, "unknown textAlign"),
    }
}

fn horizontal_text_align(out: &mut StyleMap, value: &str) {
    match value {
        "left" | "center" | "right" => set(out, "textAlign", value),
        "centerX" => set(out, "textAlign", "center"),
        "centerY" => center_vertically(out),
        other => tracing::debug!(value = other, "unknown textAlign"),
    }
}
