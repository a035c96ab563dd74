//! Resolution scope.

use mural_relief::Root;

/// Everything a reference needs to resolve: the store, the current page and the
/// asset base URL for tilde references.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub root: &'a Root,
    pub page: &'a str,
    pub base_url: Option<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new(root: &'a Root, page: &'a str) -> Self {
        Self {
            root,
            page,
            base_url: None,
        }
    }

    /// Set the base URL used by tilde references.
    pub fn with_base_url(mut self, base_url: Option<&'a str>) -> Self {
        self.base_url = base_url;
        self
    }
}
