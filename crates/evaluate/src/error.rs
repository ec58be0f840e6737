//! Evaluation error types.

/// Errors that can occur during evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// One or more validation checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation { count: usize, details: String },

    /// A required series was not found.
    #[error("series '{id}' not found in {location}")]
    MissingSeries { id: String, location: String },

    /// A required forecast column was not found.
    #[error("column '{name}' not found in the forecast frame")]
    MissingColumn { name: String },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
