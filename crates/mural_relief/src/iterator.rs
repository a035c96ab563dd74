//! List-iterator data scopes.

use compact_str::CompactString;
use serde_json::Value;

/// The data object bound to a list item under the list's iterator variable.
#[derive(Debug, Clone, PartialEq)]
pub struct IteratorScope {
    /// Declared iterator variable name (e.g. `itemObject`)
    pub var: CompactString,
    /// The list entry for this item
    pub data: Value,
    /// Position of the item in its list
    pub index: usize,
}

impl IteratorScope {
    pub fn new(var: impl Into<CompactString>, data: Value, index: usize) -> Self {
        Self {
            var: var.into(),
            data,
            index,
        }
    }

    /// Whether `key` addresses this scope: either the variable itself or a path
    /// under it (`item` or `item.name`).
    pub fn owns(&self, key: &str) -> bool {
        self.sub_path(key).is_some()
    }

    /// The remainder of `key` after the iterator variable.
    ///
    /// Returns `Some("")` when the key is exactly the variable.
    pub fn sub_path<'k>(&self, key: &'k str) -> Option<&'k str> {
        let rest = key.strip_prefix(self.var.as_str())?;
        if rest.is_empty() {
            Some("")
        } else {
            rest.strip_prefix('.')
        }
    }

    /// Look up a key against the bound data object.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        match self.sub_path(key)? {
            "" => Some(&self.data),
            path => mural_carton::get_path(&self.data, path),
        }
    }
}
