//! Reference resolution errors.

/// Why a reference could not produce a terminal value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferenceError {
    /// A path segment is absent from the store.
    #[error("unresolved reference `{reference}`: segment `{segment}` not found")]
    Unresolved { reference: String, segment: String },

    /// A page-scoped reference was resolved without a current page.
    #[error("local reference `{reference}` resolved without a current page")]
    NoPage { reference: String },

    /// The reference chain revisits a reference it already followed.
    #[error("circular reference: {}", chain.join(" -> "))]
    Circular { chain: Vec<String> },

    /// The reference chain is longer than the hop limit.
    #[error("reference `{reference}` exceeded {limit} hops")]
    TooDeep { reference: String, limit: usize },
}

/// Result type for reference resolution.
pub type ReferenceResult<T> = Result<T, ReferenceError>;
