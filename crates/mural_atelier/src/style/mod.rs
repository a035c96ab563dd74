//! Declarative style computation.
//!
//! A blueprint's `style` object mixes shorthand keys (`axis`, `align`, `border`),
//! bare numbers, viewport fractions, legacy colors and references. This module
//! turns it into a flat, unit-normalized [`StyleMap`].
//!
//! Computation order:
//! 1. every value is resolved (iterator data, references, conditionals)
//! 2. compound keys expand: `axis`, `align`, `textAlign`, `border`
//! 3. remaining keys are normalized one by one, so an explicit key always wins
//!    over a compound expansion
//! 4. rounded corners without a visible border get a transparent border
//! 5. per-type defaults fill in whatever is still missing

pub mod align;
pub mod border;
pub mod defaults;
pub mod size;

use mural_armature::{evaluate_conditional, is_conditional, is_reference, resolve_value};
use mural_carton::{normalize_color, value_to_string, with_px};
use mural_relief::{Component, StyleMap};
use serde_json::Value;

use crate::context::ResolveContext;

/// Keys expanded before everything else.
const COMPOUND_KEYS: [&str; 4] = ["axis", "align", "textAlign", "border"];

/// Compute the concrete style of a component from scratch.
pub fn compute_style(component: &Component, ctx: &ResolveContext<'_>) -> StyleMap {
    let mut out = StyleMap::new();
    let declared = component.blueprint.style();

    if let Some(declared) = declared {
        let resolved: Vec<(&str, Value)> = declared
            .iter()
            .map(|(key, value)| (key.as_str(), resolve_style_value(component, ctx, key, value)))
            .collect();

        for (key, value) in &resolved {
            match *key {
                "axis" => align::apply_axis(&mut out, value),
                "align" => align::apply_align(&mut out, value),
                "textAlign" => align::apply_text_align(&mut out, value),
                "border" => border::apply_border(&mut out, value),
                _ => {}
            }
        }

        for (key, value) in &resolved {
            if COMPOUND_KEYS.contains(key) {
                continue;
            }
            if let Some((name, css)) = normalize_entry(key, value, ctx) {
                out.insert(name, css);
            }
        }
    }

    border::synthesize_radius_border(&mut out);
    defaults::apply_defaults(component.kind(), declared, &mut out);
    out
}

fn resolve_style_value(
    component: &Component,
    ctx: &ResolveContext<'_>,
    key: &str,
    value: &Value,
) -> Value {
    match value {
        Value::String(s) => {
            if let Some(found) = component.iterator.as_ref().and_then(|scope| scope.lookup(s)) {
                return found.clone();
            }
            if is_reference(s) {
                return resolve_value(value, &ctx.scope());
            }
            value.clone()
        }
        other if is_conditional(other) => {
            evaluate_conditional(other, key, Some(component), ctx.if_hook(), &ctx.scope())
        }
        other => other.clone(),
    }
}

/// Concrete `(property, value)` for one plain style key.
fn normalize_entry(key: &str, value: &Value, ctx: &ResolveContext<'_>) -> Option<(String, String)> {
    if let Some(extent) = size::extent_of(key) {
        let css = size::size_value(value, extent, ctx.options.viewport.as_ref())?;
        return Some((key.to_string(), css));
    }

    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(_) | Value::Bool(_) => value_to_string(value),
        Value::Null => return None,
        Value::Array(_) | Value::Object(_) => {
            tracing::debug!(key, "dropping non-scalar style value");
            return None;
        }
    };

    Some(match key {
        "fontSize" | "borderRadius" | "borderWidth" => (key.to_string(), with_px(&text)),
        "fontStyle" if text == "bold" => ("fontWeight".to_string(), text),
        _ if is_color_key(key) => (key.to_string(), normalize_color(&text)),
        _ => (key.to_string(), text),
    })
}

/// Keys whose `0x` values are legacy colors.
fn is_color_key(key: &str) -> bool {
    matches!(key, "color" | "background") || key.ends_with("Color")
}
