//! Blueprint construction errors.

/// Error raised when a JSON value cannot be read as a blueprint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlueprintError {
    /// The node is not a JSON object.
    #[error("blueprint at {path} must be an object, got {found}")]
    NotAnObject { path: String, found: &'static str },

    /// The node has no string `type` discriminator.
    #[error("blueprint at {path} is missing a string `type`")]
    MissingType { path: String },

    /// `children` is present but not an array.
    #[error("blueprint at {path} has non-array `children`")]
    InvalidChildren { path: String },

    /// `style` is present but not an object.
    #[error("blueprint at {path} has non-object `style`")]
    InvalidStyle { path: String },
}

/// Result type for blueprint construction.
pub type BlueprintResult<T> = Result<T, BlueprintError>;

/// Short name of a JSON value's kind, for error messages.
pub fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
