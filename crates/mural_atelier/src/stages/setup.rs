//! Setup stage.
//!
//! Registers the keys the lazy reader resolves on every access, then binds action
//! chains for user events and emit-bound properties.

use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use mural_carton::phf_map;
use mural_relief::{ActionChain, ActionResult, BoundAction, Component, ComponentEvent};
use serde_json::{Map, Value};

use super::resolve_data_key;
use crate::accessor::needs_interception;
use crate::chain::{Next, Stage};
use crate::collaborators::ActionChainOptions;
use crate::context::ResolveContext;
use crate::errors::{StageError, StageResult};

/// Declared event key to trigger name.
static EVENT_TRIGGERS: phf::Map<&'static str, &'static str> = phf_map! {
    "onClick" => "onClick",
    "onHover" => "onHover",
    "onBlur" => "onBlur",
    "onChange" => "onChange",
    "onFocus" => "onFocus",
    "onInput" => "onInput",
    "onMouseEnter" => "onMouseEnter",
    "onMouseLeave" => "onMouseLeave",
    "onMouseOut" => "onMouseOut",
    "onMouseOver" => "onMouseOver",
    "postMessage" => "postMessage",
    "onTextChange" => "onInput",
};

/// Emit-capable key to the property its first result is written to.
static EMIT_TARGETS: phf::Map<&'static str, &'static str> = phf_map! {
    "path" => "src",
    "placeholder" => "placeholder",
    "dataValue" => "data-value",
};

/// Whether a value is `{ emit: { ... } }`.
pub(crate) fn is_emit(value: &Value) -> bool {
    value.get("emit").is_some_and(Value::is_object)
}

pub struct SetupStage;

#[async_trait]
impl Stage for SetupStage {
    fn name(&self) -> &str {
        "setup"
    }

    async fn transform(
        &self,
        component: &mut Component,
        ctx: &ResolveContext<'_>,
        next: Next<'_>,
    ) -> StageResult {
        register_interceptors(component);
        bind_events(component, ctx);
        bind_emits(component, ctx).await;
        next.run(component, ctx).await;
        Ok(())
    }
}

fn register_interceptors(component: &mut Component) {
    let keys: Vec<String> = component
        .blueprint
        .props
        .iter()
        .filter(|(key, value)| !EVENT_TRIGGERS.contains_key(key.as_str()) && needs_interception(value))
        .map(|(key, _)| key.clone())
        .collect();
    component.intercepted.extend(keys);
}

fn build_chain(
    component: &Component,
    ctx: &ResolveContext<'_>,
    trigger: &str,
    actions: &[Value],
    data_object: Option<Value>,
) -> Option<Arc<dyn ActionChain>> {
    let factory = ctx.collaborators.actions.as_ref()?;
    let options = ActionChainOptions {
        component,
        page: ctx.page(),
        data_object,
        hook: ctx.collaborators.action_hook.as_ref(),
    };
    match factory.create(trigger, actions, &options) {
        Ok(chain) => Some(chain),
        Err(message) => {
            let err = StageError::ActionChain {
                trigger: trigger.to_string(),
                message,
            };
            tracing::error!(id = component.id, "{err}");
            None
        }
    }
}

fn bind_events(component: &mut Component, ctx: &ResolveContext<'_>) {
    let blueprint = component.blueprint.clone();
    for (key, value) in &blueprint.props {
        let Some(trigger) = EVENT_TRIGGERS.get(key.as_str()) else {
            continue;
        };
        let Some(actions) = value.as_array() else {
            tracing::warn!(id = component.id, key = key.as_str(), "event binding is not an action list; skipping");
            continue;
        };
        if let Some(chain) = build_chain(component, ctx, trigger, actions, None) {
            component.actions.insert(
                CompactString::new(trigger),
                BoundAction {
                    trigger: CompactString::new(trigger),
                    actions: actions.clone(),
                    chain,
                },
            );
        }
    }
}

/// Data object an emit operates on: a single key, or an object of named keys.
fn emit_data_object(component: &Component, ctx: &ResolveContext<'_>, data_key: &Value) -> Option<Value> {
    match data_key {
        Value::String(key) => resolve_data_key(component, ctx, key),
        Value::Object(keys) => {
            let resolved: Map<String, Value> = keys
                .iter()
                .map(|(name, key)| {
                    let value = key
                        .as_str()
                        .and_then(|key| resolve_data_key(component, ctx, key))
                        .unwrap_or(Value::Null);
                    (name.clone(), value)
                })
                .collect();
            Some(Value::Object(resolved))
        }
        _ => None,
    }
}

async fn bind_emits(component: &mut Component, ctx: &ResolveContext<'_>) {
    let blueprint = component.blueprint.clone();
    for (key, target) in EMIT_TARGETS.entries() {
        let Some(emit) = blueprint.get(key).and_then(|value| value.get("emit")) else {
            continue;
        };
        let Some(actions) = emit.get("actions").and_then(Value::as_array) else {
            tracing::warn!(id = component.id, key = *key, "emit without an action list; skipping");
            continue;
        };
        let data_object = emit
            .get("dataKey")
            .and_then(|data_key| emit_data_object(component, ctx, data_key));

        let Some(chain) = build_chain(component, ctx, key, actions, data_object) else {
            continue;
        };
        component.actions.insert(
            CompactString::new(key),
            BoundAction {
                trigger: CompactString::new(key),
                actions: actions.clone(),
                chain: chain.clone(),
            },
        );

        if !ctx.options.prime_emits {
            continue;
        }
        let results = chain.execute().await;
        let Some(value) = ActionResult::first_result(&results).cloned() else {
            tracing::debug!(id = component.id, key = *key, "emit produced no result");
            continue;
        };
        component.set_prop(target, value.clone());
        component.raise(ComponentEvent::EmitResolved {
            trigger: CompactString::new(key),
            key: CompactString::new(target),
            value,
        });
    }
}
