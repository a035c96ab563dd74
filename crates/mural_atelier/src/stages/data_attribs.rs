//! Data-attribute stage: `dataKey`, media sources and `select` options.

use async_trait::async_trait;
use mural_armature::is_reference;
use mural_relief::{kind_name, Component, ComponentKind};
use serde_json::{json, Value};

use super::resolve_data_key;
use super::setup::is_emit;
use crate::accessor::ComponentExt;
use crate::chain::{Next, Stage};
use crate::collaborators::is_absolute_url;
use crate::context::ResolveContext;
use crate::errors::{StageError, StageResult};

/// Keys a media source may be declared under, in priority order.
const MEDIA_KEYS: [&str; 3] = ["path", "resource", "image"];

pub struct DataAttribsStage;

#[async_trait]
impl Stage for DataAttribsStage {
    fn name(&self) -> &str {
        "dataAttribs"
    }

    async fn transform(
        &self,
        component: &mut Component,
        ctx: &ResolveContext<'_>,
        next: Next<'_>,
    ) -> StageResult {
        bind_data_key(component, ctx)?;
        bind_media(component, ctx);
        if *component.kind() == ComponentKind::Select {
            bind_options(component, ctx)?;
        }
        next.run(component, ctx).await;
        Ok(())
    }
}

fn bind_data_key(component: &mut Component, ctx: &ResolveContext<'_>) -> StageResult {
    let key = match component.blueprint.get("dataKey") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(key)) => key.clone(),
        Some(other) => return Err(StageError::InvalidDataKey(kind_name(other).to_string())),
    };

    let mut value = resolve_data_key(component, ctx, &key);
    if component.kind().is_text_producing() {
        value = value.map(|value| apply_formatter(component, ctx, value));
    }

    component.set_prop("data-key", Value::String(key));
    component.set_prop("data-value", value.unwrap_or_else(|| Value::String(String::new())));
    Ok(())
}

/// Pipe a value through the formatter named by `text=func`, if any.
fn apply_formatter(component: &Component, ctx: &ResolveContext<'_>, value: Value) -> Value {
    let Some(name) = component.blueprint.get("text=func").and_then(Value::as_str) else {
        return value;
    };
    match ctx.collaborators.formatters.get(name) {
        Some(formatter) => formatter(&value),
        None => {
            tracing::warn!(id = component.id, formatter = name, "unknown formatter; value left as is");
            value
        }
    }
}

fn bind_media(component: &mut Component, ctx: &ResolveContext<'_>) {
    let Some(key) = MEDIA_KEYS.into_iter().find(|key| {
        component
            .blueprint
            .get(key)
            .is_some_and(|value| !value.is_null() && !is_emit(value))
    }) else {
        return;
    };
    let base_url = ctx.options.base_url.as_deref();
    // Only plain strings can name iterator data; everything else goes through the reader.
    let iterated = component
        .blueprint
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| component.iterator.as_ref()?.lookup(raw));
    let src = match iterated {
        Some(Value::String(url)) => match base_url {
            Some(base) if !url.starts_with(base) && !is_absolute_url(url) => {
                ctx.collaborators.assets.resolve_asset_url(url, Some(base))
            }
            _ => url.clone(),
        },
        Some(_) => return,
        None => {
            let Some(resolved) = component.reader(ctx).get_str(key) else {
                return;
            };
            ctx.collaborators.assets.resolve_asset_url(&resolved, base_url)
        }
    };
    component.set_prop("src", Value::String(src));
}

fn bind_options(component: &mut Component, ctx: &ResolveContext<'_>) -> StageResult {
    let declared = match component.reader(ctx).get("options") {
        None | Some(Value::Null) => return Ok(()),
        Some(value) => value,
    };

    let list = match declared {
        Value::Array(items) => items,
        Value::String(key) => match resolve_data_key(component, ctx, &key) {
            Some(Value::Array(items)) => items,
            Some(other) => return Err(StageError::InvalidOptions(kind_name(&other).to_string())),
            None if is_reference(&key) => {
                tracing::debug!(id = component.id, reference = key.as_str(), "options unresolved");
                Vec::new()
            }
            None => Vec::new(),
        },
        other => return Err(StageError::InvalidOptions(kind_name(&other).to_string())),
    };

    let options: Vec<Value> = list
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            if mural_carton::is_primitive(&entry) {
                json!({ "index": index, "key": entry, "value": entry, "label": entry })
            } else {
                entry
            }
        })
        .collect();
    component.set_prop("options", Value::Array(options));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ResolverChain;
    use crate::collaborators::Collaborators;
    use crate::options::ResolveOptions;
    use crate::stages::SetupStage;
    use mural_relief::{Blueprint, ComponentTree, IteratorScope, Root};
    use std::sync::Arc;

    async fn resolve_with(
        component: Component,
        root: &Root,
        options: &ResolveOptions,
        collaborators: &Collaborators,
    ) -> Component {
        let tree = ComponentTree::new();
        let ctx = ResolveContext::new(root, &tree, options, collaborators);
        let mut chain = ResolverChain::new();
        chain.use_internal(SetupStage).unwrap();
        chain.use_stage(DataAttribsStage).unwrap();

        let mut component = component;
        chain.resolve(Some(&mut component), &ctx).await;
        component
    }

    async fn resolve(blueprint: Blueprint, root: &Root) -> Component {
        resolve_with(
            Component::new(1, Arc::new(blueprint)),
            root,
            &ResolveOptions::for_page("Home").with_base_url("https://cdn.test/"),
            &Collaborators::default(),
        )
        .await
    }

    #[tokio::test]
    async fn test_data_key_from_page() {
        let root = Root::from_value(json!({ "Home": { "user": { "name": "Ann" } } }));
        let label = resolve(Blueprint::new("label").with("dataKey", json!("user.name")), &root).await;
        assert_eq!(label.prop("data-key"), Some(&json!("user.name")));
        assert_eq!(label.prop("data-value"), Some(&json!("Ann")));

        let missing = resolve(Blueprint::new("label").with("dataKey", json!("user.age")), &root).await;
        assert_eq!(missing.prop("data-value"), Some(&json!("")));
    }

    #[tokio::test]
    async fn test_invalid_data_key_is_recorded() {
        let root = Root::new();
        let label = resolve(Blueprint::new("label").with("dataKey", json!(5)), &root).await;
        assert!(label.has_failures());
        assert_eq!(label.prop("data-value"), None);
    }

    #[tokio::test]
    async fn test_formatter_applies_to_text() {
        let root = Root::from_value(json!({ "Home": { "price": 5 } }));
        let collaborators = Collaborators::new().with_formatter("money", |value: &Value| {
            json!(format!("${}", mural_carton::value_to_string(value)))
        });
        let label = resolve_with(
            Component::new(
                1,
                Arc::new(
                    Blueprint::new("label")
                        .with("dataKey", json!("price"))
                        .with("text=func", json!("money")),
                ),
            ),
            &root,
            &ResolveOptions::for_page("Home"),
            &collaborators,
        )
        .await;
        assert_eq!(label.prop("data-value"), Some(&json!("$5")));
    }

    #[tokio::test]
    async fn test_media_sources() {
        let root = Root::from_value(json!({ "Home": { "avatar": "me.png" } }));

        let plain = resolve(Blueprint::new("image").with("path", json!("logo.png")), &root).await;
        assert_eq!(plain.prop("src"), Some(&json!("https://cdn.test/logo.png")));

        let referenced = resolve(Blueprint::new("image").with("path", json!("..avatar")), &root).await;
        assert_eq!(referenced.prop("src"), Some(&json!("https://cdn.test/me.png")));

        let emitted = resolve(
            Blueprint::new("image").with("path", json!({ "emit": { "actions": [] } })),
            &root,
        )
        .await;
        assert_eq!(emitted.prop("src"), None);
    }

    #[tokio::test]
    async fn test_conditional_media_path() {
        let root = Root::from_value(json!({ "Home": { "on": true } }));
        let image = resolve(
            Blueprint::new("image").with("path", json!({ "if": ["..on", "a.png", "b.png"] })),
            &root,
        )
        .await;
        assert_eq!(image.prop("src"), Some(&json!("https://cdn.test/a.png")));

        root.set_path("Home.on", json!(false));
        let off = resolve(
            Blueprint::new("image").with("path", json!({ "if": ["..on", "a.png", "b.png"] })),
            &root,
        )
        .await;
        assert_eq!(off.prop("src"), Some(&json!("https://cdn.test/b.png")));
    }

    #[tokio::test]
    async fn test_iterator_media_gets_base_once() {
        let root = Root::new();
        let options = ResolveOptions::for_page("Home").with_base_url("https://cdn.test/");
        let collaborators = Collaborators::default();
        let scope = IteratorScope::new(
            "item",
            json!({ "pic": "a.png", "full": "https://cdn.test/b.png" }),
            0,
        );

        let relative = resolve_with(
            Component::new(1, Arc::new(Blueprint::new("image").with("path", json!("item.pic"))))
                .with_iterator(Some(Arc::new(scope.clone()))),
            &root,
            &options,
            &collaborators,
        )
        .await;
        assert_eq!(relative.prop("src"), Some(&json!("https://cdn.test/a.png")));

        let prefixed = resolve_with(
            Component::new(1, Arc::new(Blueprint::new("image").with("path", json!("item.full"))))
                .with_iterator(Some(Arc::new(scope))),
            &root,
            &options,
            &collaborators,
        )
        .await;
        assert_eq!(prefixed.prop("src"), Some(&json!("https://cdn.test/b.png")));
    }

    #[tokio::test]
    async fn test_select_options_normalized() {
        let root = Root::from_value(json!({ "Home": { "sizes": ["S", "M"] } }));
        let select = resolve(Blueprint::new("select").with("options", json!("..sizes")), &root).await;
        assert_eq!(
            select.prop("options"),
            Some(&json!([
                { "index": 0, "key": "S", "value": "S", "label": "S" },
                { "index": 1, "key": "M", "value": "M", "label": "M" },
            ]))
        );

        let by_key = resolve(Blueprint::new("select").with("options", json!("sizes")), &root).await;
        assert_eq!(by_key.prop("options").and_then(Value::as_array).map(Vec::len), Some(2));

        let bad = resolve(Blueprint::new("select").with("options", json!(4)), &root).await;
        assert!(bad.has_failures());
    }
}
