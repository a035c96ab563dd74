//! Relief - The data model of Mural.
//!
//! This crate defines the shapes every resolver stage works on:
//! - [`Blueprint`]: the immutable declarative description of one node
//! - [`Component`]: the live, mutable node a blueprint is resolved into
//! - [`ComponentTree`]: id-indexed ownership of components
//! - [`Root`]: the shared, externally owned data store
//! - [`IteratorScope`]: the per-list-item data binding
//!
//! ## Name Origin
//!
//! **Relief** is a sculpture raised from a flat background. Blueprints are the flat
//! background; the resolved component tree is what stands out from it.

pub mod action;
pub mod blueprint;
pub mod component;
pub mod errors;
pub mod event;
pub mod iterator;
pub mod root;
pub mod tree;

pub use action::{ActionChain, ActionResult, BoundAction};
pub use blueprint::{Blueprint, ComponentKind};
pub use component::{Component, ComponentId, ListExpansion, StyleMap};
pub use errors::{kind_name, BlueprintError, BlueprintResult};
pub use event::ComponentEvent;
pub use iterator::IteratorScope;
pub use root::Root;
pub use tree::ComponentTree;
