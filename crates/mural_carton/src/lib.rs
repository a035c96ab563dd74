//! Carton - The shared toolbox for Mural.
//!
//! This crate provides the small, dependency-light helpers every other Mural crate
//! leans on: value coercions with JavaScript-like semantics, CSS unit handling,
//! legacy color normalization and content fingerprints.
//!
//! # Modules
//!
//! - **general**: truthiness, string coercion, numeric detection, dot paths
//! - **units**: pixel suffixing for style values
//! - **color**: legacy `0x` hex color normalization
//! - **hash**: xxHash3 fingerprints of resolved JSON values
//!
//! # Example
//!
//! ```
//! use mural_carton::{normalize_color, with_px};
//!
//! assert_eq!(with_px("10"), "10px");
//! assert_eq!(normalize_color("0xFF0000"), "#ff0000");
//! ```

pub mod color;
pub mod general;
pub mod hash;
pub mod units;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::phf_map;

// Re-export shared utilities
pub use color::*;
pub use general::*;
pub use units::*;
