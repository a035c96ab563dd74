//! Atelier - The resolution workshop of Mural.
//!
//! This crate turns a [`ComponentTree`] built from blueprints into resolved
//! components by running every component through a [`ResolverChain`]:
//!
//! ```text
//! setup ──▶ components ──▶ styles ──▶ dataAttribs
//! ```
//!
//! - **setup**: installs the lazy property reader, binds event and emit actions
//! - **components**: type-specific resolution (lists, pages, text boards)
//! - **styles**: declarative style attributes to concrete, unit-normalized style
//! - **dataAttribs**: `dataKey`, media and `select` option binding
//!
//! The [`Pipeline`] walks the tree level by level, resolving siblings
//! concurrently and stamping out list items between levels.
//!
//! ## Name Origin
//!
//! **Atelier** (/ˌætəlˈjeɪ/) is an artist's workshop. Blueprints come in as
//! sketches; resolved components leave as finished pieces.

pub mod accessor;
pub mod chain;
pub mod collaborators;
pub mod context;
pub mod errors;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod stages;
pub mod style;

pub use accessor::{ComponentExt, PropertyReader};
pub use chain::{Next, ResolverChain, Stage};
pub use collaborators::{
    ActionChainFactory, ActionChainHook, ActionChainOptions, AssetUrlResolver, Collaborators,
    DefaultAssetResolver, DefaultQueryObjects, Formatter, QueryObjectProvider,
};
pub use context::ResolveContext;
pub use errors::{ChainError, ChainResult, StageError, StageResult};
pub use logging::init_tracing;
pub use options::{ResolveOptions, Viewport};
pub use pipeline::Pipeline;

// Re-export the data model and grammar
pub use mural_armature::{IfContext, IfHook, Scope};
pub use mural_relief::{
    ActionChain, ActionResult, Blueprint, Component, ComponentEvent, ComponentId, ComponentKind,
    ComponentTree, IteratorScope, Root, StyleMap,
};
