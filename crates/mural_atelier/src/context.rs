//! The options bag every stage receives.

use mural_armature::{IfHook, Scope};
use mural_relief::{ComponentTree, Root};

use crate::collaborators::Collaborators;
use crate::options::ResolveOptions;

/// Shared, read-only context for resolving one tree level.
#[derive(Clone)]
pub struct ResolveContext<'a> {
    /// The shared data store
    pub root: &'a Root,
    /// Already-resolved components (ancestors of the level being resolved)
    pub tree: &'a ComponentTree,
    pub options: &'a ResolveOptions,
    pub collaborators: &'a Collaborators,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        root: &'a Root,
        tree: &'a ComponentTree,
        options: &'a ResolveOptions,
        collaborators: &'a Collaborators,
    ) -> Self {
        Self {
            root,
            tree,
            options,
            collaborators,
        }
    }

    /// Reference resolution scope for the current page.
    pub fn scope(&self) -> Scope<'_> {
        Scope::new(self.root, &self.options.page).with_base_url(self.options.base_url.as_deref())
    }

    /// Current page name.
    #[inline]
    pub fn page(&self) -> &str {
        &self.options.page
    }

    /// Installed predicate hook.
    pub fn if_hook(&self) -> Option<&dyn IfHook> {
        self.collaborators.if_hook.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scope_follows_options() {
        let root = Root::from_value(json!({ "Home": { "x": 1 } }));
        let tree = ComponentTree::new();
        let options = ResolveOptions::for_page("Home").with_base_url("https://cdn.test/");
        let collaborators = Collaborators::default();
        let ctx = ResolveContext::new(&root, &tree, &options, &collaborators);

        assert_eq!(ctx.page(), "Home");
        let scope = ctx.scope();
        assert_eq!(scope.page, "Home");
        assert_eq!(scope.base_url, Some("https://cdn.test/"));
        assert!(ctx.if_hook().is_none());
    }
}
