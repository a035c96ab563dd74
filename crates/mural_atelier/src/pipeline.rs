//! Tree driver.
//!
//! Walks a [`ComponentTree`] level by level. Every component of a level is detached
//! from the tree, resolved concurrently against a context that borrows the rest
//! of the tree (its already-resolved ancestors), then reattached. Lists stamp out
//! their items before the walk descends, so list items resolve on the next level.

use std::sync::Arc;

use futures::future::join_all;
use mural_relief::{
    Blueprint, Component, ComponentId, ComponentKind, ComponentTree, IteratorScope, ListExpansion, Root,
};

use crate::chain::ResolverChain;
use crate::collaborators::Collaborators;
use crate::context::ResolveContext;
use crate::options::ResolveOptions;

/// A resolver chain plus the collaborators its stages use.
#[derive(Debug, Clone)]
pub struct Pipeline {
    chain: ResolverChain,
    collaborators: Collaborators,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Collaborators::default())
    }
}

impl Pipeline {
    /// A pipeline running the standard chain.
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_chain(ResolverChain::standard(), collaborators)
    }

    pub fn with_chain(chain: ResolverChain, collaborators: Collaborators) -> Self {
        Self {
            chain,
            collaborators,
        }
    }

    pub fn chain(&self) -> &ResolverChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut ResolverChain {
        &mut self.chain
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    /// Resolve one component that is not attached to `tree`.
    pub async fn resolve_component(
        &self,
        component: &mut Component,
        tree: &ComponentTree,
        root: &Root,
        options: &ResolveOptions,
    ) {
        component.reset();
        let ctx = ResolveContext::new(root, tree, options, &self.collaborators);
        self.chain.resolve(Some(component), &ctx).await;
    }

    /// Build a tree from a blueprint and resolve it.
    pub async fn resolve_blueprint(
        &self,
        blueprint: Arc<Blueprint>,
        root: &Root,
        options: &ResolveOptions,
    ) -> ComponentTree {
        let mut tree = ComponentTree::from_blueprint(blueprint);
        self.resolve_tree(&mut tree, root, options).await;
        tree
    }

    /// Resolve every component of a tree, parents before children.
    ///
    /// Running this again over an unchanged root produces the same properties and
    /// styles; list items are only recreated when the list data changed.
    pub async fn resolve_tree(&self, tree: &mut ComponentTree, root: &Root, options: &ResolveOptions) {
        let Some(root_id) = tree.root() else {
            tracing::warn!("tree has no root component");
            return;
        };

        let mut level = vec![root_id];
        let mut depth = 0usize;
        while !level.is_empty() {
            tracing::debug!(depth, components = level.len(), page = options.page.as_str(), "resolving level");

            let mut detached: Vec<Component> = level.iter().filter_map(|id| tree.detach(*id)).collect();
            for component in &mut detached {
                component.reset();
            }

            {
                let ctx = ResolveContext::new(root, tree, options, &self.collaborators);
                join_all(
                    detached
                        .iter_mut()
                        .map(|component| self.chain.resolve(Some(component), &ctx)),
                )
                .await;
            }

            let mut next_level = Vec::new();
            for component in detached {
                let id = component.id;
                let expansion = component.list.clone();
                let is_list = *component.kind() == ComponentKind::List;
                tree.attach(component);
                match expansion {
                    Some(expansion) => expand_list(tree, id, expansion),
                    // The chain stopped before the list was expanded.
                    None if is_list => tree.clear_children(id),
                    None => {}
                }
                next_level.extend(tree.children(id));
            }

            level = next_level;
            depth += 1;
        }
    }
}

/// Instantiate a list's template child once per item.
fn expand_list(tree: &mut ComponentTree, list_id: ComponentId, expansion: ListExpansion) {
    let Some(template) = tree
        .get(list_id)
        .and_then(|list| list.blueprint.children.first().cloned())
    else {
        if !expansion.items.is_empty() {
            tracing::warn!(id = list_id, "list has items but no child blueprint");
        }
        return;
    };

    let existing = tree.children(list_id);
    let unchanged = existing.len() == expansion.items.len()
        && existing.iter().zip(&expansion.items).all(|(id, item)| {
            tree.get(*id)
                .and_then(|child| child.iterator.as_ref())
                .is_some_and(|scope| scope.var == expansion.iterator_var && scope.data == *item)
        });
    if unchanged {
        return;
    }

    tree.clear_children(list_id);
    for (index, item) in expansion.items.into_iter().enumerate() {
        let scope = Arc::new(IteratorScope::new(expansion.iterator_var.clone(), item, index));
        tree.instantiate(template.clone(), Some(list_id), Some(scope));
    }
}
