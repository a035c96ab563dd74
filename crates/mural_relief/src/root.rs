//! The shared root data store.
//!
//! The store maps page names to page objects and also carries page-independent
//! top-level entries. It is owned and mutated by the embedding application; the
//! resolution pipeline holds the read lock only for the span of a single lookup so
//! every read observes the latest committed state.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Cheaply clonable handle to the root data store.
#[derive(Debug, Clone, Default)]
pub struct Root {
    inner: Arc<RwLock<Map<String, Value>>>,
}

impl Root {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a JSON object; any other value yields an empty store.
    pub fn from_value(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Clone of a top-level entry (a page object or a global).
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).cloned()
    }

    /// Clone of the value at a dot path from the top level.
    pub fn get_path(&self, path: &str) -> Option<Value> {
        let guard = self.inner.read();
        let (head, rest) = split_head(path);
        let top = guard.get(head)?;
        match rest {
            Some(rest) => mural_carton::get_path(top, rest).cloned(),
            None => Some(top.clone()),
        }
    }

    /// Clone of the value at a dot path inside the named page.
    pub fn get_page_path(&self, page: &str, path: &str) -> Option<Value> {
        let guard = self.inner.read();
        let page_object = guard.get(page)?;
        mural_carton::get_path(page_object, path).cloned()
    }

    /// Replace a top-level entry.
    pub fn set(&self, key: &str, value: Value) {
        self.inner.write().insert(key.to_string(), value);
    }

    /// Write a value at a dot path, creating intermediate objects.
    ///
    /// Returns `false` when an intermediate value is not an object.
    pub fn set_path(&self, path: &str, value: Value) -> bool {
        let mut guard = self.inner.write();
        let (head, rest) = split_head(path);
        match rest {
            None => {
                guard.insert(head.to_string(), value);
                true
            }
            Some(rest) => {
                let entry = guard.entry(head.to_string()).or_insert(Value::Null);
                mural_carton::set_path(entry, rest, value)
            }
        }
    }

    /// Run a closure with read access to the whole store.
    ///
    /// The lock is held for the duration of the closure only.
    pub fn read<R>(&self, f: impl FnOnce(&Map<String, Value>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run a closure with write access to the whole store.
    pub fn update<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Snapshot of the whole store as a JSON object.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.inner.read().clone())
    }
}

fn split_head(path: &str) -> (&str, Option<&str>) {
    let path = path.trim_start_matches('.');
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> Root {
        Root::from_value(json!({
            "SignIn": { "formData": { "email": "a@b.c" } },
            "Global": { "user": { "name": "Ann" } }
        }))
    }

    #[test]
    fn test_get_path() {
        let root = store();
        assert_eq!(root.get_path("Global.user.name"), Some(json!("Ann")));
        assert_eq!(root.get_path("Global"), Some(json!({ "user": { "name": "Ann" } })));
        assert_eq!(root.get_path("Global.user.age"), None);
        assert_eq!(root.get_path("Nope"), None);
    }

    #[test]
    fn test_get_page_path() {
        let root = store();
        assert_eq!(
            root.get_page_path("SignIn", "formData.email"),
            Some(json!("a@b.c"))
        );
        assert_eq!(root.get_page_path("Other", "formData.email"), None);
    }

    #[test]
    fn test_writes_are_visible_to_clones() {
        let root = store();
        let handle = root.clone();
        assert!(root.set_path("SignIn.formData.email", json!("x@y.z")));
        assert_eq!(
            handle.get_page_path("SignIn", "formData.email"),
            Some(json!("x@y.z"))
        );

        handle.set("Fresh", json!(1));
        assert_eq!(root.get("Fresh"), Some(json!(1)));
    }

    #[test]
    fn test_update() {
        let root = store();
        let count = root.update(|map| {
            map.remove("Global");
            map.len()
        });
        assert_eq!(count, 1);
        assert_eq!(root.get("Global"), None);
    }
}
