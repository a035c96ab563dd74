//! External collaborator seams.
//!
//! The pipeline never performs I/O itself. Everything that reaches outside the
//! resolution core goes through one of these traits:
//! - [`ActionChainFactory`]: builds executable action sequences
//! - [`AssetUrlResolver`]: turns raw media paths into URLs
//! - [`QueryObjectProvider`]: supplies the scopes a `dataKey` is looked up in
//! - [`IfHook`]: evaluates conditional predicates

use std::fmt;
use std::sync::Arc;

use compact_str::CompactString;
use mural_armature::IfHook;
use mural_relief::{ActionChain, Component, Root};
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Callback threaded through to every action chain the factory builds.
pub type ActionChainHook = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Named value formatter for text-producing components.
pub type Formatter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// What the factory gets to know about the chain it builds.
pub struct ActionChainOptions<'a> {
    /// Component the chain is bound to
    pub component: &'a Component,
    /// Current page name
    pub page: &'a str,
    /// Data object the chain operates on (emit `dataKey` binding)
    pub data_object: Option<Value>,
    /// Embedder hook, if any
    pub hook: Option<&'a ActionChainHook>,
}

/// Builds executable action chains from raw action lists.
pub trait ActionChainFactory: Send + Sync {
    fn create(
        &self,
        trigger: &str,
        actions: &[Value],
        options: &ActionChainOptions<'_>,
    ) -> Result<Arc<dyn ActionChain>, String>;
}

/// Turns a raw media path into a URL.
pub trait AssetUrlResolver: Send + Sync {
    fn resolve_asset_url(&self, raw: &str, base_url: Option<&str>) -> String;
}

/// Supplies the ordered lookup scopes for a `dataKey`.
pub trait QueryObjectProvider: Send + Sync {
    fn query_objects(&self, component: &Component, page: &str, root: &Root) -> Vec<Value>;

    /// First value at `key` across the query objects.
    ///
    /// Providers that can answer without materializing every object should
    /// override this.
    fn find(&self, component: &Component, page: &str, root: &Root, key: &str) -> Option<Value> {
        self.query_objects(component, page, root)
            .iter()
            .find_map(|object| mural_carton::get_path(object, key).cloned())
    }
}

/// Joins relative paths onto the base URL; absolute URLs are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAssetResolver;

const ABSOLUTE_PREFIXES: [&str; 4] = ["http://", "https://", "data:", "blob:"];

/// Whether a URL needs no base.
pub fn is_absolute_url(url: &str) -> bool {
    ABSOLUTE_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

impl AssetUrlResolver for DefaultAssetResolver {
    fn resolve_asset_url(&self, raw: &str, base_url: Option<&str>) -> String {
        if is_absolute_url(raw) {
            return raw.to_string();
        }
        let Some(base) = base_url else {
            return raw.to_string();
        };
        if raw.starts_with(base) {
            return raw.to_string();
        }
        let path = raw.strip_prefix("~/").unwrap_or(raw).trim_start_matches('/');
        if base.ends_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Looks `dataKey`s up in the current page first, then at the root.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQueryObjects;

impl QueryObjectProvider for DefaultQueryObjects {
    fn query_objects(&self, _component: &Component, page: &str, root: &Root) -> Vec<Value> {
        let mut objects = Vec::with_capacity(2);
        if let Some(page_object) = root.get(page) {
            objects.push(page_object);
        }
        objects.push(root.snapshot());
        objects
    }

    fn find(&self, _component: &Component, page: &str, root: &Root, key: &str) -> Option<Value> {
        root.get_page_path(page, key).or_else(|| root.get_path(key))
    }
}

/// Every collaborator one pipeline uses.
#[derive(Clone)]
pub struct Collaborators {
    pub actions: Option<Arc<dyn ActionChainFactory>>,
    pub action_hook: Option<ActionChainHook>,
    pub assets: Arc<dyn AssetUrlResolver>,
    pub queries: Arc<dyn QueryObjectProvider>,
    pub if_hook: Option<Arc<dyn IfHook>>,
    pub formatters: FxHashMap<CompactString, Formatter>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            actions: None,
            action_hook: None,
            assets: Arc::new(DefaultAssetResolver),
            queries: Arc::new(DefaultQueryObjects),
            if_hook: None,
            formatters: FxHashMap::default(),
        }
    }
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(mut self, factory: impl ActionChainFactory + 'static) -> Self {
        self.actions = Some(Arc::new(factory));
        self
    }

    pub fn with_action_hook(mut self, hook: impl Fn(&str, &Value) + Send + Sync + 'static) -> Self {
        self.action_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_assets(mut self, assets: impl AssetUrlResolver + 'static) -> Self {
        self.assets = Arc::new(assets);
        self
    }

    pub fn with_queries(mut self, queries: impl QueryObjectProvider + 'static) -> Self {
        self.queries = Arc::new(queries);
        self
    }

    pub fn with_if_hook(mut self, hook: impl IfHook + 'static) -> Self {
        self.if_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_formatter(
        mut self,
        name: &str,
        formatter: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.formatters
            .insert(CompactString::new(name), Arc::new(formatter));
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("actions", &self.actions.is_some())
            .field("action_hook", &self.action_hook.is_some())
            .field("if_hook", &self.if_hook.is_some())
            .field("formatters", &self.formatters.len())
            .finish_non_exhaustive()
    }
}
