//! Blueprint definitions.
//!
//! A blueprint is the original declarative object for one node. It is never mutated
//! after construction; components hold it behind an [`Arc`] and every resolver
//! stage reads from it.

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use serde_json::{Map, Value};

use crate::errors::{kind_name, BlueprintError, BlueprintResult};

/// Known component types.
///
/// Unknown types are preserved verbatim in [`ComponentKind::Other`]; they resolve
/// like a plain view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    View,
    Label,
    Span,
    Button,
    Image,
    Video,
    List,
    ListItem,
    Select,
    TextField,
    TextView,
    TextBoard,
    Header,
    Footer,
    ScrollView,
    PopUp,
    Page,
    Other(CompactString),
}

impl ComponentKind {
    /// Parse a blueprint `type` string.
    pub fn parse(name: &str) -> Self {
        match name {
            "view" => Self::View,
            "label" => Self::Label,
            "span" => Self::Span,
            "button" => Self::Button,
            "image" => Self::Image,
            "video" => Self::Video,
            "list" => Self::List,
            "listItem" => Self::ListItem,
            "select" => Self::Select,
            "textField" => Self::TextField,
            "textView" => Self::TextView,
            "textBoard" => Self::TextBoard,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "scrollView" => Self::ScrollView,
            "popUp" | "popUpView" => Self::PopUp,
            "page" => Self::Page,
            other => Self::Other(CompactString::new(other)),
        }
    }

    /// The blueprint `type` string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "view",
            Self::Label => "label",
            Self::Span => "span",
            Self::Button => "button",
            Self::Image => "image",
            Self::Video => "video",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::Select => "select",
            Self::TextField => "textField",
            Self::TextView => "textView",
            Self::TextBoard => "textBoard",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::ScrollView => "scrollView",
            Self::PopUp => "popUp",
            Self::Page => "page",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Components whose bound value is displayed as text.
    pub fn is_text_producing(&self) -> bool {
        matches!(
            self,
            Self::Label | Self::Span | Self::TextField | Self::TextView
        )
    }

    /// Components rendered as list containers or list rows.
    pub fn is_list_like(&self) -> bool {
        matches!(self, Self::List | Self::ListItem)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable declarative source of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Parsed `type` discriminator
    pub kind: ComponentKind,
    /// Every declared key except `type` and `children`
    pub props: Map<String, Value>,
    /// Nested blueprints in declaration order
    pub children: Vec<Arc<Blueprint>>,
}

impl Blueprint {
    /// Create a bare blueprint of the given type.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: ComponentKind::parse(kind),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    /// Set a declared property.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.props.insert(key.to_string(), value);
        self
    }

    /// Append a child blueprint.
    pub fn with_child(mut self, child: Blueprint) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Build a blueprint tree from a JSON value.
    pub fn from_value(value: &Value) -> BlueprintResult<Arc<Blueprint>> {
        Self::from_value_at(value, "$").map(Arc::new)
    }

    fn from_value_at(value: &Value, path: &str) -> BlueprintResult<Blueprint> {
        let Value::Object(object) = value else {
            return Err(BlueprintError::NotAnObject {
                path: path.to_string(),
                found: kind_name(value),
            });
        };

        let kind = match object.get("type") {
            Some(Value::String(name)) => ComponentKind::parse(name),
            _ => {
                return Err(BlueprintError::MissingType {
                    path: path.to_string(),
                })
            }
        };

        if let Some(style) = object.get("style") {
            if !style.is_object() && !style.is_null() {
                return Err(BlueprintError::InvalidStyle {
                    path: path.to_string(),
                });
            }
        }

        let children = match object.get("children") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, child)| {
                    Self::from_value_at(child, &format!("{path}.children[{i}]")).map(Arc::new)
                })
                .collect::<BlueprintResult<Vec<_>>>()?,
            Some(_) => {
                return Err(BlueprintError::InvalidChildren {
                    path: path.to_string(),
                })
            }
        };

        let props = object
            .iter()
            .filter(|(key, _)| key.as_str() != "type" && key.as_str() != "children")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Blueprint {
            kind,
            props,
            children,
        })
    }

    /// Raw declared value of a key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Whether the blueprint declares the key.
    #[inline]
    pub fn has(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Declared style object, if any.
    pub fn style(&self) -> Option<&Map<String, Value>> {
        self.props.get("style").and_then(Value::as_object)
    }

    /// Declared `dataKey`, if it is a string.
    pub fn data_key(&self) -> Option<&str> {
        self.props.get("dataKey").and_then(Value::as_str)
    }

    /// Declared `iteratorVar`, if it is a string.
    pub fn iterator_var(&self) -> Option<&str> {
        self.props.get("iteratorVar").and_then(Value::as_str)
    }
}
