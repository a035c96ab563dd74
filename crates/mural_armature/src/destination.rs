//! Page-destination grammar.
//!
//! Two shapes are recognized, in order:
//!
//! 1. `Target@Current#Tag`: a page component URL. Every segment may itself be a
//!    reference and is resolved on its own.
//! 2. `^anchor` or `Page^anchor;key:value`: a jump to an anchor, either on the
//!    same page (leading denoter) or on another page.
//!
//! Anything else is a plain page name.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reference::resolve_value;
use crate::scope::Scope;

/// Default anchor denoter.
pub const DEFAULT_DENOTER: char = '^';

/// Default scroll duration for anchor jumps, in milliseconds.
pub const DEFAULT_DURATION: u64 = 350;

static PAGE_COMPONENT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^@#]+)@([^@#]+)#([^@#]+)$").expect("valid regex"));

/// Anchor grammar settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationOptions {
    /// Character separating a page name from an anchor id
    #[serde(default = "default_denoter")]
    pub denoter: char,
    /// Default jump duration in milliseconds
    #[serde(default = "default_duration")]
    pub duration: u64,
}

fn default_denoter() -> char {
    DEFAULT_DENOTER
}

fn default_duration() -> u64 {
    DEFAULT_DURATION
}

impl Default for DestinationOptions {
    fn default() -> Self {
        Self {
            denoter: DEFAULT_DENOTER,
            duration: DEFAULT_DURATION,
        }
    }
}

/// A resolved `Target@Current#Tag` destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageComponentUrl {
    pub target_page: String,
    pub current_page: String,
    pub view_tag: String,
}

/// A page or anchor jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageJump {
    /// Destination page; empty for same-page jumps
    pub destination: String,
    /// Anchor id; empty when no anchor was given
    pub id: String,
    pub is_same_page: bool,
    /// Jump duration in milliseconds
    pub duration: u64,
    /// Additional `key:value` pairs after the anchor
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

/// A parsed destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    PageComponent(PageComponentUrl),
    Jump(PageJump),
}

impl Destination {
    /// JSON form of the destination.
    pub fn to_value(&self) -> Value {
        match self {
            Self::PageComponent(url) => serde_json::json!({
                "targetPage": url.target_page,
                "currentPage": url.current_page,
                "viewTag": url.view_tag,
            }),
            Self::Jump(jump) => {
                let mut object = serde_json::Map::new();
                object.insert("destination".into(), Value::String(jump.destination.clone()));
                object.insert("id".into(), Value::String(jump.id.clone()));
                object.insert("isSamePage".into(), Value::Bool(jump.is_same_page));
                object.insert("duration".into(), Value::from(jump.duration));
                for (key, value) in &jump.extras {
                    object.insert(key.clone(), Value::String(value.clone()));
                }
                Value::Object(object)
            }
        }
    }
}

/// Split a `Target@Current#Tag` string into its raw segments.
pub fn split_page_component_url(value: &str) -> Option<(&str, &str, &str)> {
    let caps = PAGE_COMPONENT_URL.captures(value)?;
    let (_, [target, current, tag]) = caps.extract();
    Some((target, current, tag))
}

/// Whether a string is a `Target@Current#Tag` page component URL.
#[inline]
pub fn is_page_component_url(value: &str) -> bool {
    PAGE_COMPONENT_URL.is_match(value)
}

/// Parse and resolve a destination string.
pub fn resolve_destination(
    value: &str,
    scope: &Scope<'_>,
    options: &DestinationOptions,
) -> Destination {
    if let Some((target, current, tag)) = split_page_component_url(value) {
        return Destination::PageComponent(PageComponentUrl {
            target_page: resolve_segment(target, scope),
            current_page: resolve_segment(current, scope),
            view_tag: resolve_segment(tag, scope),
        });
    }
    Destination::Jump(parse_jump(value, options))
}

fn resolve_segment(segment: &str, scope: &Scope<'_>) -> String {
    mural_carton::value_to_string(&resolve_value(&Value::String(segment.to_string()), scope))
}

/// Parse the anchor grammar; strings without the denoter are plain page names.
pub fn parse_jump(value: &str, options: &DestinationOptions) -> PageJump {
    let mut jump = PageJump {
        destination: String::new(),
        id: String::new(),
        is_same_page: false,
        duration: options.duration,
        extras: BTreeMap::new(),
    };

    let anchor = if let Some(rest) = value.strip_prefix(options.denoter) {
        jump.is_same_page = true;
        rest
    } else if let Some((page, rest)) = value.split_once(options.denoter) {
        jump.destination = page.to_string();
        rest
    } else {
        jump.destination = value.to_string();
        return jump;
    };

    let mut parts = anchor.split(';');
    jump.id = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let Some((key, raw)) = part.split_once(':') else {
            continue;
        };
        let (key, raw) = (key.trim(), raw.trim());
        if key.is_empty() {
            continue;
        }
        if key == "duration" {
            if let Ok(ms) = raw.parse::<u64>() {
                jump.duration = ms;
            }
            continue;
        }
        jump.extras.insert(key.to_string(), raw.to_string());
    }

    jump
}
