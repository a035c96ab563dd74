//! Viewport-relative position and size keys.
//!
//! Numbers in `(0, 1]` are fractions of the viewport extent along the key's axis,
//! other numbers are pixels, unit-bearing strings pass through untouched.

use mural_carton::{as_number, format_number, phf_map, px};
use serde_json::Value;

use crate::options::Viewport;

/// Which viewport extent a key is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    Width,
    Height,
}

impl Extent {
    fn of(self, viewport: &Viewport) -> f64 {
        match self {
            Self::Width => viewport.width,
            Self::Height => viewport.height,
        }
    }
}

static SIZE_KEYS: phf::Map<&'static str, Extent> = phf_map! {
    "left" => Extent::Width,
    "right" => Extent::Width,
    "width" => Extent::Width,
    "minWidth" => Extent::Width,
    "maxWidth" => Extent::Width,
    "marginLeft" => Extent::Width,
    "marginRight" => Extent::Width,
    "paddingLeft" => Extent::Width,
    "paddingRight" => Extent::Width,
    "top" => Extent::Height,
    "bottom" => Extent::Height,
    "height" => Extent::Height,
    "minHeight" => Extent::Height,
    "maxHeight" => Extent::Height,
    "marginTop" => Extent::Height,
    "marginBottom" => Extent::Height,
    "paddingTop" => Extent::Height,
    "paddingBottom" => Extent::Height,
};

/// Extent a style key is measured against, if it is a size key.
pub fn extent_of(key: &str) -> Option<Extent> {
    SIZE_KEYS.get(key).copied()
}

/// Concrete CSS length for a size value.
pub fn size_value(value: &Value, extent: Extent, viewport: Option<&Viewport>) -> Option<String> {
    if let Some(n) = as_number(value) {
        return Some(resolve_number(n, extent, viewport));
    }
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn resolve_number(n: f64, extent: Extent, viewport: Option<&Viewport>) -> String {
    if n == 0.0 {
        return "0px".to_string();
    }
    match viewport {
        Some(viewport) if n > 0.0 && n <= 1.0 => {
            let pixels = (n * extent.of(viewport) * 100.0).round() / 100.0;
            format!("{}px", format_number(pixels))
        }
        _ => px(n),
    }
}
