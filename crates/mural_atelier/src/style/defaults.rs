//! Per-type style defaults.

use mural_relief::{ComponentKind, StyleMap};
use serde_json::{Map, Value};

fn default(out: &mut StyleMap, key: &str, value: &str) {
    out.entry(key.to_string()).or_insert_with(|| value.to_string());
}

/// Fill in the defaults for a component type without overriding computed keys.
pub fn apply_defaults(kind: &ComponentKind, declared: Option<&Map<String, Value>>, out: &mut StyleMap) {
    match kind {
        ComponentKind::Header => default(out, "zIndex", "100"),
        ComponentKind::Image => {
            default(out, "objectFit", "contain");
            let declares = |key: &str| declared.is_some_and(|style| style.contains_key(key));
            if !declares("width") {
                out.remove("width");
            }
            if !declares("height") {
                out.remove("height");
            }
        }
        kind if kind.is_list_like() => {
            default(out, "listStyle", "none");
            default(out, "padding", "0px");
            // A horizontal axis has already made this a flex row.
            default(out, "display", "block");
        }
        ComponentKind::PopUp => default(out, "visibility", "hidden"),
        ComponentKind::ScrollView => {
            default(out, "display", "block");
            default(out, "overflowY", "auto");
        }
        ComponentKind::TextView => default(out, "resize", "none"),
        ComponentKind::Video => default(out, "objectFit", "contain"),
        _ => {}
    }
}
