//! Error types for the hermes-reconcile crate.

/// Error type for all fallible operations in the hermes-reconcile crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReconcileError {
    /// Returned when an input matrix disagrees with the hierarchy shape.
    #[error("dimension mismatch for {name}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which input disagrees.
        name: String,
        /// Expected extent.
        expected: usize,
        /// Observed extent.
        got: usize,
    },

    /// Returned when a configuration is rejected by validation.
    #[error("{count} configuration error(s): {details}")]
    InvalidConfig {
        /// Number of individual problems found.
        count: usize,
        /// Semicolon-separated problem descriptions.
        details: String,
    },

    /// Returned when a method name cannot be parsed.
    #[error("unknown reconciliation method '{name}'")]
    UnknownMethod {
        /// The offending name.
        name: String,
    },

    /// Returned when a linear system arising in a projection cannot be
    /// solved.
    #[error("linear system is singular ({context})")]
    SingularSystem {
        /// Which computation produced the system.
        context: String,
    },

    /// Returned when the top-level series is zero throughout the training
    /// window, so no disaggregation proportions exist.
    #[error("top-level series is zero throughout the training window")]
    DegenerateTopLevel,

    /// Returned when too few complete residual columns are available.
    ///
    /// A column is complete when every series has a finite residual at
    /// that step.
    #[error("insufficient residuals: got {n} complete column(s), need at least {min}")]
    InsufficientResiduals {
        /// Complete columns found.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when an input carries NaN or infinite values where finite
    /// values are required.
    #[error("non-finite values in {name}")]
    NonFinite {
        /// Which input is affected.
        name: String,
    },

    /// Returned when the standard normal distribution cannot be constructed.
    #[error("normal distribution construction failed: {reason}")]
    Distribution {
        /// Message from the underlying distribution library.
        reason: String,
    },
}
