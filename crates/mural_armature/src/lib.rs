//! Armature - The resolution grammar of Mural.
//!
//! Blueprint values are not always literal. This crate recognizes and resolves the
//! three symbolic shapes a value can take:
//! - **References** (`.Global.user`, `..formData.email`, `~/logo.png`, `=.x`, `..x@`)
//! - **Conditionals** (`{ "if": [predicate, truthy, falsy] }`)
//! - **Destinations** (`Target@Current#Tag`, `Page^anchor;duration:300`)
//!
//! Every function here is synchronous and never suspends; the only shared state is
//! the [`Root`](mural_relief::Root) handle carried in a [`Scope`].
//!
//! ## Name Origin
//!
//! An **armature** is the wire skeleton a sculptor builds before adding clay. The
//! grammar is the skeleton the rest of the pipeline hangs its values on.

pub mod conditional;
pub mod destination;
pub mod errors;
pub mod reference;
pub mod scope;

pub use conditional::{evaluate_conditional, is_conditional, Conditional, IfContext, IfHook};
pub use destination::{
    is_page_component_url, resolve_destination, Destination, DestinationOptions,
    PageComponentUrl, PageJump, DEFAULT_DENOTER, DEFAULT_DURATION,
};
pub use errors::{ReferenceError, ReferenceResult};
pub use reference::{
    is_reference, resolve_reference, resolve_traced, resolve_value, Reference, ReferenceScope,
    Resolved, MAX_REFERENCE_HOPS,
};
pub use scope::Scope;
