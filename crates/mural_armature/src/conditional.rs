//! Conditional evaluator.
//!
//! A conditional is an object `{ "if": [predicate, truthy, falsy] }`. The predicate
//! picks a branch; the chosen branch is returned after reference resolution. The
//! predicate itself is never returned.

use mural_relief::Component;
use serde_json::Value;

use crate::reference::{is_reference, resolve_reference, resolve_value};
use crate::scope::Scope;

/// Nested conditionals deeper than this resolve to their raw branch.
const MAX_NESTING: usize = 16;

/// Everything a predicate hook gets to see.
#[derive(Debug, Clone, Copy)]
pub struct IfContext<'a> {
    /// Component whose property is being read, if any
    pub component: Option<&'a Component>,
    /// Current page name
    pub page: &'a str,
    /// Property key holding the conditional
    pub key: &'a str,
    /// The predicate slot
    pub value: &'a Value,
}

/// Embedder-supplied predicate evaluation.
pub trait IfHook: Send + Sync {
    fn evaluate(&self, ctx: &IfContext<'_>) -> bool;
}

impl<F> IfHook for F
where
    F: Fn(&IfContext<'_>) -> bool + Send + Sync,
{
    fn evaluate(&self, ctx: &IfContext<'_>) -> bool {
        self(ctx)
    }
}

/// A borrowed view of a well-formed conditional triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditional<'v> {
    pub predicate: &'v Value,
    pub truthy: &'v Value,
    pub falsy: &'v Value,
}

impl<'v> Conditional<'v> {
    /// Read a conditional object; `None` unless `if` holds exactly three entries.
    pub fn parse(value: &'v Value) -> Option<Self> {
        match value.get("if")?.as_array()?.as_slice() {
            [predicate, truthy, falsy] => Some(Self {
                predicate,
                truthy,
                falsy,
            }),
            _ => None,
        }
    }
}

/// Whether a value is conditional-shaped (an object with an `if` key).
#[inline]
pub fn is_conditional(value: &Value) -> bool {
    value.as_object().is_some_and(|object| object.contains_key("if"))
}

/// Evaluate a conditional and return the selected, resolved branch.
///
/// Malformed conditionals are returned unchanged.
pub fn evaluate_conditional(
    value: &Value,
    key: &str,
    component: Option<&Component>,
    hook: Option<&dyn IfHook>,
    scope: &Scope<'_>,
) -> Value {
    evaluate_at(value, key, component, hook, scope, 0)
}

fn evaluate_at(
    value: &Value,
    key: &str,
    component: Option<&Component>,
    hook: Option<&dyn IfHook>,
    scope: &Scope<'_>,
    depth: usize,
) -> Value {
    let Some(conditional) = Conditional::parse(value) else {
        tracing::warn!(key, "malformed conditional; expected `if: [predicate, a, b]`");
        return value.clone();
    };

    let passed = match hook {
        Some(hook) => hook.evaluate(&IfContext {
            component,
            page: scope.page,
            key,
            value: conditional.predicate,
        }),
        None => default_predicate(conditional.predicate, scope),
    };

    let branch = if passed {
        conditional.truthy
    } else {
        conditional.falsy
    };

    if is_conditional(branch) && depth < MAX_NESTING {
        return evaluate_at(branch, key, component, hook, scope, depth + 1);
    }
    resolve_value(branch, scope)
}

/// Best-effort predicate evaluation used when no hook is installed.
///
/// References are resolved and tested for truthiness; an unresolvable reference is
/// falsy. Every other value uses loose truthiness.
pub fn default_predicate(predicate: &Value, scope: &Scope<'_>) -> bool {
    match predicate {
        Value::Bool(b) => *b,
        Value::String(s) if is_reference(s) => resolve_reference(s, scope)
            .map(|resolved| mural_carton::is_truthy(&resolved))
            .unwrap_or(false),
        other => mural_carton::is_truthy(other),
    }
}
