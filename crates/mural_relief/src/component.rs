//! Live component definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::action::BoundAction;
use crate::blueprint::{Blueprint, ComponentKind};
use crate::event::ComponentEvent;
use crate::iterator::IteratorScope;

/// Unique identifier for components.
pub type ComponentId = u64;

/// Concrete style declarations, ordered by property name.
pub type StyleMap = BTreeMap<String, String>;

/// Item data a list produced, waiting to be instantiated as children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListExpansion {
    /// Iterator variable each item is bound under
    pub iterator_var: CompactString,
    /// One entry per list item
    pub items: Vec<Value>,
}

/// A live node resolved from a [`Blueprint`].
#[derive(Debug)]
pub struct Component {
    /// Unique component ID
    pub id: ComponentId,
    /// The immutable source
    pub blueprint: Arc<Blueprint>,
    /// Owning parent, if any
    pub parent: Option<ComponentId>,
    /// Owned child IDs in order
    pub children: SmallVec<[ComponentId; 4]>,
    /// Inherited list-item binding
    pub iterator: Option<Arc<IteratorScope>>,
    /// Values written by resolver stages
    pub props: Map<String, Value>,
    /// Concrete style produced by the style stage
    pub style: StyleMap,
    /// Blueprint keys whose reads are re-resolved on every access
    pub intercepted: FxHashSet<String>,
    /// Action chains bound per trigger
    pub actions: FxHashMap<CompactString, BoundAction>,
    /// Items a list wants instantiated
    pub list: Option<ListExpansion>,
    /// Events raised while resolving
    pub events: Vec<ComponentEvent>,
}

impl Component {
    /// Create a new component.
    pub fn new(id: ComponentId, blueprint: Arc<Blueprint>) -> Self {
        Self {
            id,
            blueprint,
            parent: None,
            children: SmallVec::new(),
            iterator: None,
            props: Map::new(),
            style: StyleMap::new(),
            intercepted: FxHashSet::default(),
            actions: FxHashMap::default(),
            list: None,
            events: Vec::new(),
        }
    }

    /// Bind an iterator scope.
    pub fn with_iterator(mut self, scope: Option<Arc<IteratorScope>>) -> Self {
        self.iterator = scope;
        self
    }

    /// The component type.
    #[inline]
    pub fn kind(&self) -> &ComponentKind {
        &self.blueprint.kind
    }

    /// Resolved property written by a stage.
    #[inline]
    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// Write a resolved property.
    pub fn set_prop(&mut self, key: &str, value: Value) {
        self.props.insert(key.to_string(), value);
    }

    /// Record an event.
    pub fn raise(&mut self, event: ComponentEvent) {
        self.events.push(event);
    }

    /// Bound action chain for a trigger.
    pub fn action(&self, trigger: &str) -> Option<&BoundAction> {
        self.actions.get(trigger)
    }

    /// Whether any stage failure was recorded.
    pub fn has_failures(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, ComponentEvent::StageFailed { .. }))
    }

    /// Fingerprint of everything the stages resolved.
    ///
    /// Two passes over an unchanged root yield equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        let props = mural_carton::hash::hash_entries(
            self.props.iter().map(|(key, value)| (key.as_str(), value)),
        );
        let style: Vec<(&str, Value)> = self
            .style
            .iter()
            .map(|(key, value)| (key.as_str(), Value::String(value.clone())))
            .collect();
        let style = mural_carton::hash::hash_entries(style.iter().map(|(key, value)| (*key, value)));
        props ^ style.rotate_left(1)
    }

    /// Clear everything a previous resolution pass produced.
    pub fn reset(&mut self) {
        self.props.clear();
        self.style.clear();
        self.intercepted.clear();
        self.actions.clear();
        self.list = None;
        self.events.clear();
    }
}
