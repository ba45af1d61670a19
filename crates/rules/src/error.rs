//! Error types for rule parsing, evaluation, and persistence.

/// Errors that can occur while working with rule trees.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A stored tree uses a filter type this build does not understand,
    /// i.e. the document was written by a newer version of the module.
    #[error("unknown filter type: '{0}'")]
    Configuration(String),

    /// A single rule is malformed (e.g. its search pattern does not compile).
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Persistence collaborator failure.
    #[error("store error: {0}")]
    Store(String),
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;
