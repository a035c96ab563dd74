//! Resolver chain and stage errors.

use compact_str::CompactString;

/// Error raised when configuring a resolver chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// A stage with this name is already registered.
    #[error("stage `{0}` is already registered")]
    DuplicateStage(CompactString),

    /// No stage with this name is registered.
    #[error("no stage named `{0}`")]
    UnknownStage(CompactString),

    /// Internal stages cannot be removed or disabled.
    #[error("stage `{0}` is internal and cannot be changed")]
    InternalStage(CompactString),
}

/// Result type for chain configuration.
pub type ChainResult<T> = Result<T, ChainError>;

/// Error raised by a resolver stage while transforming a component.
///
/// Stage errors never escape the chain: they are logged and recorded on the
/// component, and resolution of other components continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageError {
    /// `dataKey` is present but is not a string.
    #[error("`dataKey` must be a string, got {0}")]
    InvalidDataKey(String),

    /// A list's `listObject` is a literal that is not an array.
    #[error("`listObject` must resolve to an array, got {0}")]
    InvalidListObject(String),

    /// A `select` component's `options` cannot be read as a list.
    #[error("`options` must resolve to an array, got {0}")]
    InvalidOptions(String),

    /// A collaborator refused to build an action chain.
    #[error("action chain for `{trigger}` rejected: {message}")]
    ActionChain { trigger: String, message: String },

    /// Any other stage-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for stage transforms.
pub type StageResult = Result<(), StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ChainError::InternalStage("setup".into()).to_string(),
            "stage `setup` is internal and cannot be changed"
        );
        assert_eq!(
            StageError::InvalidDataKey("number".into()).to_string(),
            "`dataKey` must be a string, got number"
        );
    }
}
