//! Components stage: type-specific resolution.

use async_trait::async_trait;
use compact_str::CompactString;
use mural_armature::{is_reference, resolve_value};
use mural_relief::{kind_name, Component, ComponentEvent, ComponentKind, ListExpansion};
use serde_json::{json, Value};

use crate::accessor::ComponentExt;
use crate::chain::{Next, Stage};
use crate::context::ResolveContext;
use crate::errors::{StageError, StageResult};

pub struct ComponentsStage;

#[async_trait]
impl Stage for ComponentsStage {
    fn name(&self) -> &str {
        "components"
    }

    async fn transform(
        &self,
        component: &mut Component,
        ctx: &ResolveContext<'_>,
        next: Next<'_>,
    ) -> StageResult {
        let kind = component.kind().clone();
        match kind {
            ComponentKind::List => resolve_list(component, ctx)?,
            ComponentKind::Page => resolve_page(component, ctx),
            ComponentKind::TextBoard => resolve_text_board(component, ctx),
            ComponentKind::Image | ComponentKind::Video => {
                if component.blueprint.has("onClick") {
                    component.set_prop("data-clickable", Value::Bool(true));
                }
            }
            _ => {}
        }

        if let Some(tag) = component.reader(ctx).get("viewTag") {
            component.set_prop("data-viewtag", tag);
        }

        next.run(component, ctx).await;
        Ok(())
    }
}

fn resolve_list(component: &mut Component, ctx: &ResolveContext<'_>) -> StageResult {
    // Items from an earlier pass must not survive a list that no longer expands.
    let Some(iterator_var) = component.blueprint.iterator_var().map(CompactString::new) else {
        tracing::warn!(id = component.id, "list without `iteratorVar`; items not expanded");
        component.list = Some(ListExpansion::default());
        return Ok(());
    };

    let items = match component.reader(ctx).get("listObject") {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) if is_reference(&s) => {
            tracing::debug!(id = component.id, reference = s.as_str(), "list data unresolved; rendering empty");
            Vec::new()
        }
        Some(other) => {
            component.list = Some(ListExpansion {
                iterator_var,
                items: Vec::new(),
            });
            return Err(StageError::InvalidListObject(kind_name(&other).to_string()));
        }
    };

    let count = items.len();
    component.set_prop("listObject", Value::Array(items.clone()));
    component.list = Some(ListExpansion {
        iterator_var,
        items,
    });
    component.raise(ComponentEvent::ListResolved { count });
    Ok(())
}

fn resolve_page(component: &mut Component, ctx: &ResolveContext<'_>) {
    if let Some(page) = component.reader(ctx).get_str("path") {
        component.set_prop("data-page", Value::String(page));
    }
}

fn resolve_text_board(component: &mut Component, ctx: &ResolveContext<'_>) {
    let Some(items) = component.blueprint.get("textBoard").and_then(Value::as_array) else {
        return;
    };
    let scope = ctx.scope();
    let board: Vec<Value> = items
        .iter()
        .filter_map(|item| {
            if item.get("br").is_some() {
                return Some(json!({ "br": true }));
            }
            let text = item.get("text")?;
            let mut entry = item.as_object()?.clone();
            entry.insert("text".into(), resolve_value(text, &scope));
            Some(Value::Object(entry))
        })
        .collect();
    component.set_prop("data-text-board", Value::Array(board));
}
