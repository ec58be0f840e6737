//! Error types for the hermes-ar crate.

/// Error type for all fallible operations in the hermes-ar crate.
///
/// This enum covers validation failures and numerical issues that may
/// occur during AR model fitting, order selection and interval
/// computation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArError {
    /// Returned when the input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input data has fewer observations than required.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the input data contains non-finite values (NaN or infinity).
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the input data has zero variance.
    #[error("input data is constant (zero variance)")]
    ConstantData,

    /// Returned when the Levinson-Durbin recursion produces a reflection
    /// coefficient outside the unit circle.
    #[error("estimated model is non-stationary (reflection coefficient at lag {lag})")]
    NonStationary {
        /// Lag at which the recursion left the stationary region.
        lag: usize,
    },

    /// Returned when the conditional residuals have zero variance, so the
    /// Gaussian likelihood is undefined.
    #[error("residuals have zero variance, likelihood is undefined")]
    DegenerateResiduals,

    /// Returned when every candidate AR order fails to fit.
    #[error("all AR candidates failed (max_p={max_p})")]
    AllCandidatesFailed {
        /// Maximum AR order attempted.
        max_p: usize,
    },

    /// Returned when an interval level is outside the open (0, 100) range.
    #[error("invalid interval level {level}, expected 0 < level < 100")]
    InvalidLevel {
        /// The offending level.
        level: f64,
    },

    /// Returned when the standard normal distribution cannot be constructed.
    #[error("normal distribution construction failed: {reason}")]
    Distribution {
        /// Message from the underlying distribution library.
        reason: String,
    },
}
