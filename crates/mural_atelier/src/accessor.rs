//! Lazy property access.
//!
//! Keys registered as intercepted by the setup stage are re-resolved against the
//! root on every read, so root mutations between two reads are visible without
//! any cache invalidation.

use mural_armature::{
    evaluate_conditional, is_conditional, is_page_component_url, is_reference,
    resolve_destination, resolve_value,
};
use mural_relief::Component;
use serde_json::Value;

use crate::context::ResolveContext;

/// Whether a declared value needs resolution on read.
pub fn needs_interception(value: &Value) -> bool {
    match value {
        Value::String(s) => is_page_component_url(s) || is_reference(s),
        other => is_conditional(other),
    }
}

/// Reads a component's declared properties through the resolvers.
pub struct PropertyReader<'c, 'a> {
    component: &'c Component,
    ctx: &'c ResolveContext<'a>,
}

impl<'c, 'a> PropertyReader<'c, 'a> {
    pub fn new(component: &'c Component, ctx: &'c ResolveContext<'a>) -> Self {
        Self { component, ctx }
    }

    /// Read a property.
    ///
    /// Blueprint keys take precedence; keys the blueprint does not declare are
    /// read from the resolved properties.
    pub fn get(&self, key: &str) -> Option<Value> {
        let Some(raw) = self.component.blueprint.get(key) else {
            return self.component.prop(key).cloned();
        };
        if !self.component.intercepted.contains(key) {
            return Some(raw.clone());
        }
        Some(self.resolve(key, raw))
    }

    /// Read a property as a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(mural_carton::value_to_string(&other)),
        }
    }

    fn resolve(&self, key: &str, raw: &Value) -> Value {
        let scope = self.ctx.scope();
        match raw {
            Value::String(s) if is_page_component_url(s) => {
                resolve_destination(s, &scope, &self.ctx.options.destination).to_value()
            }
            Value::String(_) => resolve_value(raw, &scope),
            other if is_conditional(other) => {
                evaluate_conditional(other, key, Some(self.component), self.ctx.if_hook(), &scope)
            }
            other => other.clone(),
        }
    }
}

/// Reader access on components.
pub trait ComponentExt {
    fn reader<'c, 'a>(&'c self, ctx: &'c ResolveContext<'a>) -> PropertyReader<'c, 'a>;
}

impl ComponentExt for Component {
    fn reader<'c, 'a>(&'c self, ctx: &'c ResolveContext<'a>) -> PropertyReader<'c, 'a> {
        PropertyReader::new(self, ctx)
    }
}
