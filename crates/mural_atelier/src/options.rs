//! Resolution options.

use mural_armature::DestinationOptions;
use serde::{Deserialize, Serialize};

/// Viewport dimensions used to turn fractional sizes into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Plain settings for one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    /// Current page name; local references resolve against it
    #[serde(default)]
    pub page: String,

    /// Asset base URL for media and tilde references
    #[serde(default)]
    pub base_url: Option<String>,

    /// Viewport for fractional sizes; without one, numbers are absolute pixels
    #[serde(default)]
    pub viewport: Option<Viewport>,

    /// Whether emit-bound properties are executed during setup
    #[serde(default)]
    pub prime_emits: bool,

    /// Anchor destination grammar settings
    #[serde(default)]
    pub destination: DestinationOptions,
}

impl ResolveOptions {
    /// Options for resolving the named page.
    pub fn for_page(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Some(Viewport::new(width, height));
        self
    }

    pub fn with_prime_emits(mut self, prime: bool) -> Self {
        self.prime_emits = prime;
        self
    }
}
