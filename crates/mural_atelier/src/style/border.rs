//! Border presets and radius handling.

use mural_carton::{normalize_color, phf_map, value_to_string, with_px};
use mural_relief::StyleMap;
use serde_json::{Map, Value};

/// A numbered border style.
#[derive(Debug, Clone, Copy)]
struct Preset {
    style: Option<&'static str>,
    bottom_style: Option<&'static str>,
    radius: Option<&'static str>,
    /// Overrides target the bottom edge only
    bottom_only: bool,
    /// `borderWidth: thin` unless a width is given
    thin: bool,
}

const fn preset(style: Option<&'static str>, radius: Option<&'static str>) -> Preset {
    Preset {
        style,
        bottom_style: None,
        radius,
        bottom_only: false,
        thin: false,
    }
}

static PRESETS: phf::Map<&'static str, Preset> = phf_map! {
    "1" => preset(Some("none"), Some("0px")),
    "2" => Preset {
        style: Some("none"),
        bottom_style: Some("solid"),
        radius: Some("0px"),
        bottom_only: true,
        thin: false,
    },
    "3" => Preset { thin: true, ..preset(Some("solid"), None) },
    "4" => Preset { thin: true, ..preset(Some("dashed"), None) },
    "5" => preset(Some("none"), None),
    "6" => preset(Some("solid"), Some("0px")),
    "7" => Preset {
        style: None,
        bottom_style: Some("solid"),
        radius: Some("0px"),
        bottom_only: true,
        thin: false,
    },
};

fn set(out: &mut StyleMap, key: &str, value: impl Into<String>) {
    out.insert(key.to_string(), value.into());
}

/// Expand the `border` key.
pub fn apply_border(out: &mut StyleMap, value: &Value) {
    match value {
        Value::Number(n) if n.as_f64() == Some(0.0) => set(out, "borderStyle", "none"),
        Value::String(s) if s.trim() == "0" => set(out, "borderStyle", "none"),
        Value::String(s) => set(out, "border", s.as_str()),
        Value::Object(fields) => apply_border_object(out, fields),
        _ => tracing::debug!(?value, "unsupported border value"),
    }
}

fn apply_border_object(out: &mut StyleMap, fields: &Map<String, Value>) {
    let style = fields.get("style").map(value_to_string);
    let preset = style.as_deref().and_then(|s| PRESETS.get(s)).copied();

    let (style_key, color_key, width_key) = match preset {
        Some(p) if p.bottom_only => ("borderBottomStyle", "borderBottomColor", "borderBottomWidth"),
        _ => ("borderStyle", "borderColor", "borderWidth"),
    };

    match (preset, style) {
        (Some(p), _) => {
            if let Some(s) = p.style {
                set(out, "borderStyle", s);
            }
            if let Some(s) = p.bottom_style {
                set(out, "borderBottomStyle", s);
            }
            if let Some(r) = p.radius {
                set(out, "borderRadius", r);
            }
        }
        (None, Some(custom)) if !custom.is_empty() => set(out, "borderStyle", custom),
        _ => {}
    }

    if let Some(color) = fields.get("color") {
        set(out, color_key, normalize_color(&value_to_string(color)));
    }
    match fields.get("width") {
        Some(width) => set(out, width_key, with_px(&value_to_string(width))),
        None if preset.is_some_and(|p| p.thin) => set(out, width_key, "thin"),
        None => {}
    }
    if let Some(line) = fields.get("line") {
        set(out, style_key, value_to_string(line));
    }
}

fn is_zero_length(value: &str) -> bool {
    matches!(value.trim(), "0" | "0px" | "")
}

/// Whether the computed style draws any border.
///
/// A declared width or color counts even without a style.
fn has_visible_border(out: &StyleMap) -> bool {
    let styled = |key: &str| out.get(key).is_some_and(|s| s != "none");
    let wide = |key: &str| out.get(key).is_some_and(|s| !is_zero_length(s));
    out.contains_key("border")
        || styled("borderStyle")
        || styled("borderBottomStyle")
        || wide("borderWidth")
        || wide("borderBottomWidth")
        || out.contains_key("borderColor")
        || out.contains_key("borderBottomColor")
}

/// Give a rounded component with no visible border a transparent one, so the
/// radius still clips. Keys already present are never replaced.
pub fn synthesize_radius_border(out: &mut StyleMap) {
    let rounded = out.get("borderRadius").is_some_and(|r| !is_zero_length(r));
    if rounded && !has_visible_border(out) {
        for (key, value) in [("borderWidth", "1px"), ("borderStyle", "solid"), ("borderColor", "transparent")] {
            out.entry(key.to_string()).or_insert_with(|| value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn border(value: Value) -> StyleMap {
        let mut out = StyleMap::new();
        apply_border(&mut out, &value);
        out
    }

    #[test]
    fn test_zero_border() {
        assert_eq!(border(json!(0)).get("borderStyle").map(String::as_str), Some("none"));
        assert_eq!(border(json!("0")).get("borderStyle").map(String::as_str), Some("none"));
    }

    #[test]
    fn test_string_border_passes_through() {
        assert_eq!(border(json!("1px solid red")).get("border").map(String::as_str), Some("1px solid red"));
    }

    #[test]
    fn test_presets() {
        let one = border(json!({ "style": 1 }));
        assert_eq!(one.get("borderStyle").map(String::as_str), Some("none"));
        assert_eq!(one.get("borderRadius").map(String::as_str), Some("0px"));

        let three = border(json!({ "style": "3", "color": "0x00ff00" }));
        assert_eq!(three.get("borderStyle").map(String::as_str), Some("solid"));
        assert_eq!(three.get("borderWidth").map(String::as_str), Some("thin"));
        assert_eq!(three.get("borderColor").map(String::as_str), Some("#00ff00"));

        let four = border(json!({ "style": 4, "width": 2 }));
        assert_eq!(four.get("borderStyle").map(String::as_str), Some("dashed"));
        assert_eq!(four.get("borderWidth").map(String::as_str), Some("2px"));
    }

    #[test]
    fn test_bottom_only_overrides() {
        let two = border(json!({ "style": 2, "color": "0x000000", "width": 1, "line": "dotted" }));
        assert_eq!(two.get("borderStyle").map(String::as_str), Some("none"));
        assert_eq!(two.get("borderBottomStyle").map(String::as_str), Some("dotted"));
        assert_eq!(two.get("borderBottomColor").map(String::as_str), Some("#000000"));
        assert_eq!(two.get("borderBottomWidth").map(String::as_str), Some("1px"));
        assert!(!two.contains_key("borderColor"));
    }

    #[test]
    fn test_custom_style_name() {
        let out = border(json!({ "style": "groove" }));
        assert_eq!(out.get("borderStyle").map(String::as_str), Some("groove"));
    }

    #[test]
    fn test_declared_width_or_color_counts_as_visible() {
        let mut widths = StyleMap::new();
        widths.insert("borderRadius".into(), "8px".into());
        widths.insert("borderWidth".into(), "3px".into());
        synthesize_radius_border(&mut widths);
        assert_eq!(widths.get("borderWidth").map(String::as_str), Some("3px"));
        assert!(!widths.contains_key("borderStyle"));

        let mut colored = border(json!({ "color": "0x00ff00", "width": 2 }));
        colored.insert("borderRadius".into(), "4px".into());
        synthesize_radius_border(&mut colored);
        assert_eq!(colored.get("borderColor").map(String::as_str), Some("#00ff00"));
        assert_eq!(colored.get("borderWidth").map(String::as_str), Some("2px"));
    }

    #[test]
    fn test_radius_synthesis() {
        let mut out = StyleMap::new();
        out.insert("borderRadius".into(), "8px".into());
        synthesize_radius_border(&mut out);
        assert_eq!(out.get("borderWidth").map(String::as_str), Some("1px"));
        assert_eq!(out.get("borderStyle").map(String::as_str), Some("solid"));
        assert_eq!(out.get("borderColor").map(String::as_str), Some("transparent"));

        let mut visible = border(json!({ "style": 3 }));
        visible.insert("borderRadius".into(), "4px".into());
        synthesize_radius_border(&mut visible);
        assert_eq!(visible.get("borderWidth").map(String::as_str), Some("thin"));

        let mut hidden = StyleMap::new();
        hidden.insert("borderRadius".into(), "8px".into());
        hidden.insert("borderStyle".into(), "none".into());
        hidden.insert("borderWidth".into(), "0".into());
        synthesize_radius_border(&mut hidden);
        assert_eq!(hidden.get("borderStyle").map(String::as_str), Some("none"));
        assert_eq!(hidden.get("borderWidth").map(String::as_str), Some("0"));
        assert_eq!(hidden.get("borderColor").map(String::as_str), Some("transparent"));

        let mut square = StyleMap::new();
        square.insert("borderRadius".into(), "0px".into());
        synthesize_radius_border(&mut square);
        assert!(!square.contains_key("borderStyle"));
    }
}
