//! Component tree management.
//!
//! Components own their children by id; the tree owns every component. A child
//! only knows its parent's id, so there are no ownership cycles.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::blueprint::{Blueprint, ComponentKind};
use crate::component::{Component, ComponentId};
use crate::iterator::IteratorScope;

/// A tree of live components.
#[derive(Debug, Default)]
pub struct ComponentTree {
    /// All attached components by ID
    nodes: FxHashMap<ComponentId, Component>,
    /// Root component ID
    root: Option<ComponentId>,
    /// Next available component ID
    next_id: ComponentId,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate a whole blueprint tree and make it the root.
    ///
    /// List children are not instantiated here: a list's single child blueprint
    /// is a template that is stamped out once per item after the list resolves.
    pub fn from_blueprint(blueprint: Arc<Blueprint>) -> Self {
        let mut tree = Self::new();
        let root = tree.instantiate(blueprint, None, None);
        tree.root = Some(root);
        tree
    }

    /// Allocate a new component ID.
    pub fn next_id(&mut self) -> ComponentId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a component (and its non-list descendants) under `parent`.
    pub fn instantiate(
        &mut self,
        blueprint: Arc<Blueprint>,
        parent: Option<ComponentId>,
        iterator: Option<Arc<IteratorScope>>,
    ) -> ComponentId {
        let id = self.next_id();
        let mut component = Component::new(id, blueprint.clone()).with_iterator(iterator.clone());
        component.parent = parent;
        self.nodes.insert(id, component);

        if let Some(parent_id) = parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.push(id);
            }
        }

        if blueprint.kind != ComponentKind::List {
            for child in &blueprint.children {
                self.instantiate(child.clone(), Some(id), iterator.clone());
            }
        }

        id
    }

    /// Get the root component ID.
    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    /// Get a component by ID.
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(&id)
    }

    /// Get a mutable component by ID.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.nodes.get_mut(&id)
    }

    /// Number of attached components.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no attached components.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child IDs of a component, in order.
    pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
        self.nodes
            .get(&id)
            .map(|component| component.children.to_vec())
            .unwrap_or_default()
    }

    /// The `n`-th ancestor of a component (`1` is the parent).
    pub fn ancestor(&self, id: ComponentId, n: usize) -> Option<&Component> {
        let mut current = self.nodes.get(&id)?;
        for _ in 0..n {
            current = self.nodes.get(&current.parent?)?;
        }
        Some(current)
    }

    /// Temporarily remove a component so it can be mutated while the rest of the
    /// tree is borrowed. Pair with [`ComponentTree::attach`].
    pub fn detach(&mut self, id: ComponentId) -> Option<Component> {
        self.nodes.remove(&id)
    }

    /// Put a detached component back.
    pub fn attach(&mut self, component: Component) {
        self.nodes.insert(component.id, component);
    }

    /// Remove a component and all its descendants.
    pub fn remove(&mut self, id: ComponentId) {
        let descendants = self.collect_descendants(id);

        if let Some(parent_id) = self.nodes.get(&id).and_then(|c| c.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| *child != id);
            }
        }

        for node_id in descendants {
            self.nodes.remove(&node_id);
        }

        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// Remove every child subtree of a component.
    pub fn clear_children(&mut self, id: ComponentId) {
        for child in self.children(id) {
            self.remove(child);
        }
    }

    /// Collect a node and all its descendants, parents first.
    pub fn collect_descendants(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(node_id) = stack.pop() {
            if let Some(component) = self.nodes.get(&node_id) {
                result.push(node_id);
                stack.extend(component.children.iter().rev().copied());
            }
        }

        result
    }

    /// Iterate over all attached components.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.nodes.values()
    }
}
