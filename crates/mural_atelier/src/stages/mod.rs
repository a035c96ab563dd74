//! Built-in resolver stages.
//!
//! | Stage | Responsibility |
//! |-------|----------------|
//! | `setup` | lazy reader registration, event and emit action chains |
//! | `components` | lists, pages, text boards, view tags |
//! | `styles` | declarative style to concrete style |
//! | `dataAttribs` | `dataKey`, media and `select` options |

mod components;
mod data_attribs;
mod setup;
mod styles;

pub use components::ComponentsStage;
pub use data_attribs::DataAttribsStage;
pub use setup::SetupStage;
pub use styles::StylesStage;

use mural_armature::{is_reference, resolve_reference};
use mural_relief::Component;
use serde_json::{Map, Value};

use crate::context::ResolveContext;

/// Read a dot path out of a property map.
pub(crate) fn props_path<'v>(props: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    match path.split_once('.') {
        Some((head, rest)) => mural_carton::get_path(props.get(head)?, rest),
        None => props.get(path),
    }
}

/// Resolve a data key against the component's scopes.
///
/// Lookup order:
/// 1. leading underscores: one ancestor per underscore, read from its resolved
///    properties, then its list-item data
/// 2. the inherited iterator variable or a path under it
/// 3. reference keys through the reference resolver
/// 4. each query object from the provider, in order
pub(crate) fn resolve_data_key(
    component: &Component,
    ctx: &ResolveContext<'_>,
    key: &str,
) -> Option<Value> {
    let trimmed = key.trim_start_matches('_');
    let depth = key.len() - trimmed.len();
    if depth > 0 {
        return ancestor_lookup(component, ctx, depth, trimmed);
    }

    if let Some(value) = component.iterator.as_ref().and_then(|scope| scope.lookup(key)) {
        return Some(value.clone());
    }

    if is_reference(key) {
        return match resolve_reference(key, &ctx.scope()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(id = component.id, "{err}");
                None
            }
        };
    }

    ctx.collaborators.queries.find(component, ctx.page(), ctx.root, key)
}

fn ancestor_lookup(
    component: &Component,
    ctx: &ResolveContext<'_>,
    depth: usize,
    path: &str,
) -> Option<Value> {
    if path.is_empty() {
        return None;
    }
    // The component itself is detached while it resolves, so start from the parent.
    let ancestor = ctx.tree.ancestor(component.parent?, depth - 1)?;
    props_path(&ancestor.props, path)
        .or_else(|| {
            let scope = ancestor.iterator.as_ref()?;
            scope.lookup(path).or_else(|| mural_carton::get_path(&scope.data, path))
        })
        .cloned()
}
