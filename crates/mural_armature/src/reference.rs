//! Reference grammar and resolver.
//!
//! A reference is a string whose prefix selects where its dot path is looked up:
//!
//! | Shape          | Scope                         |
//! |----------------|-------------------------------|
//! | `.Key.path`    | root (absolute)               |
//! | `..key.path`   | the current page's object     |
//! | `=.Key`/`=..k` | eval form of the two above    |
//! | `..key@`       | await form of the two above   |
//! | `~/asset.png`  | asset under the base URL      |
//!
//! Resolution repeats while the result is itself a reference, using the same page.
//! A visited set and a hop limit stop circular or runaway chains.

use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::errors::{ReferenceError, ReferenceResult};
use crate::scope::Scope;

/// Maximum number of lookups one resolution may perform.
pub const MAX_REFERENCE_HOPS: usize = 32;

/// Where a reference's path is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceScope {
    /// Absolute from the root store
    Root,
    /// Relative to the current page's object
    Local,
    /// Relative to the asset base URL
    Asset,
}

/// A parsed reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'s> {
    /// The original string
    pub raw: &'s str,
    /// Lookup scope
    pub scope: ReferenceScope,
    /// Path with every sigil stripped
    pub path: &'s str,
    /// Written in eval form (`=.`)
    pub eval: bool,
    /// Written in await form (trailing `@`)
    pub awaited: bool,
}

impl<'s> Reference<'s> {
    /// Parse a string as a reference; `None` for literals.
    pub fn parse(raw: &'s str) -> Option<Self> {
        if let Some(path) = raw.strip_prefix("~/") {
            return (!path.is_empty()).then_some(Self {
                raw,
                scope: ReferenceScope::Asset,
                path,
                eval: false,
                awaited: false,
            });
        }

        let mut body = raw;
        let eval = match body.strip_prefix('=') {
            Some(rest) => {
                body = rest;
                true
            }
            None => false,
        };
        let awaited = match body.strip_suffix('@') {
            Some(rest) => {
                body = rest;
                true
            }
            None => false,
        };

        let (scope, path) = if let Some(path) = body.strip_prefix("..") {
            (ReferenceScope::Local, path)
        } else if let Some(path) = body.strip_prefix('.') {
            (ReferenceScope::Root, path)
        } else {
            return None;
        };

        if !path.starts_with(is_identifier_start) {
            return None;
        }

        Some(Self {
            raw,
            scope,
            path,
            eval,
            awaited,
        })
    }

    /// Perform a single lookup of this reference, without following chains.
    pub fn lookup(&self, scope: &Scope<'_>) -> ReferenceResult<Value> {
        match self.scope {
            ReferenceScope::Asset => Ok(Value::String(match scope.base_url {
                Some(base) => join_url(base, self.path),
                None => self.raw.to_string(),
            })),
            ReferenceScope::Root => scope.root.read(|map| {
                let (head, rest) = split_head(self.path);
                let top = map.get(head).ok_or_else(|| self.unresolved(head))?;
                walk(top, rest).map_err(|segment| self.unresolved(segment))
            }),
            ReferenceScope::Local => {
                if scope.page.is_empty() {
                    return Err(ReferenceError::NoPage {
                        reference: self.raw.to_string(),
                    });
                }
                scope.root.read(|map| {
                    let page = map.get(scope.page).ok_or_else(|| self.unresolved(scope.page))?;
                    walk(page, Some(self.path)).map_err(|segment| self.unresolved(segment))
                })
            }
        }
    }

    fn unresolved(&self, segment: &str) -> ReferenceError {
        ReferenceError::Unresolved {
            reference: self.raw.to_string(),
            segment: segment.to_string(),
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn split_head(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Walk a dot path, returning the first missing segment on failure.
fn walk<'p>(start: &Value, path: Option<&'p str>) -> Result<Value, &'p str> {
    let Some(path) = path else {
        return Ok(start.clone());
    };
    let mut current = start;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = mural_carton::get_segment(current, segment).ok_or(segment)?;
    }
    Ok(current.clone())
}

fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Whether a string is reference-shaped.
#[inline]
pub fn is_reference(value: &str) -> bool {
    Reference::parse(value).is_some()
}

/// A resolved value with the number of lookups it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub lookups: usize,
}

/// Resolve a reference, following chains, and report how many lookups it took.
///
/// Non-reference input resolves to itself with zero lookups. An acyclic chain of
/// `n` intermediate references takes `n + 1` lookups.
pub fn resolve_traced(value: &str, scope: &Scope<'_>) -> ReferenceResult<Resolved> {
    let mut current = value.to_string();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut chain: Vec<String> = Vec::new();
    let mut lookups = 0;

    loop {
        let Some(reference) = Reference::parse(&current) else {
            return Ok(Resolved {
                value: Value::String(current),
                lookups,
            });
        };

        chain.push(current.clone());
        if !visited.insert(current.clone()) {
            return Err(ReferenceError::Circular { chain });
        }
        if lookups == MAX_REFERENCE_HOPS {
            return Err(ReferenceError::TooDeep {
                reference: value.to_string(),
                limit: MAX_REFERENCE_HOPS,
            });
        }

        lookups += 1;
        match reference.lookup(scope)? {
            Value::String(next) if is_reference(&next) => current = next,
            terminal => return Ok(Resolved { value: terminal, lookups }),
        }
    }
}

/// Resolve a reference string to its terminal value.
pub fn resolve_reference(value: &str, scope: &Scope<'_>) -> ReferenceResult<Value> {
    resolve_traced(value, scope).map(|resolved| resolved.value)
}

/// Resolve a value if it is a reference string, falling back to the original
/// literal when resolution fails. Failures are logged, never raised.
pub fn resolve_value(value: &Value, scope: &Scope<'_>) -> Value {
    match value {
        Value::String(s) if is_reference(s) => match resolve_reference(s, scope) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(page = scope.page, "{err}; keeping literal");
                value.clone()
            }
        },
        other => other.clone(),
    }
}
