//! Error types for layer resolution.

/// Errors raised while building a facade or reading through it.
///
/// The resolver itself never fails: absent properties resolve to `None`.
/// Everything here comes from malformed input, from the convenience
/// accessors, or from caller-supplied computations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Input was neither a mapping nor a sequence of mappings.
    #[error("invalid layers: {0}")]
    InvalidLayers(String),

    /// A required property is not defined by any layer.
    #[error("property '{0}' is not defined in any layer")]
    Missing(String),

    /// A resolved value did not deserialize into the requested type.
    #[error("property '{key}' could not be decoded: {message}")]
    Decode { key: String, message: String },

    /// Failure reported by a computation.
    #[error("{0}")]
    Custom(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChainError {
    /// Build a computation failure from any displayable message.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}
