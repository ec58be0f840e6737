//! Error types for hermes-hierarchy.

/// Error type for all fallible operations in the hermes-hierarchy crate.
///
/// Covers structural problems in the level specification, key values that
/// would break the id scheme, and invariant violations in assembled
/// summing matrices and level tags.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// Returned when asked to aggregate a table with no rows.
    #[error("cannot aggregate an empty sales table")]
    EmptyTable,

    /// Returned when the level specification is structurally invalid.
    #[error("invalid hierarchy spec: {details}")]
    InvalidSpec {
        /// Human-readable summary of the problem.
        details: String,
    },

    /// Returned when the spec names a column the table does not carry.
    #[error("hierarchy column '{name}' not found among key columns [{available}]")]
    UnknownColumn {
        /// Name of the missing column.
        name: String,
        /// Comma-joined list of the columns that are present.
        available: String,
    },

    /// Returned when a key value contains the `/` id separator.
    #[error("key value '{value}' in column '{column}' contains '/'")]
    SeparatorInKey {
        /// Column the value came from.
        column: String,
        /// Offending value.
        value: String,
    },

    /// Returned when a summing matrix violates its structural invariants.
    #[error("invalid summing matrix: {details}")]
    InvalidSumming {
        /// Human-readable summary of the violation.
        details: String,
    },

    /// Returned when level tags violate their structural invariants.
    #[error("invalid level tags: {details}")]
    InvalidTags {
        /// Human-readable summary of the violation.
        details: String,
    },

    /// Wraps a frame-assembly error from hermes-io.
    #[error("frame error: {reason}")]
    Frame {
        /// Description of the underlying failure.
        reason: String,
    },
}

impl From<hermes_io::IoError> for HierarchyError {
    fn from(e: hermes_io::IoError) -> Self {
        HierarchyError::Frame {
            reason: e.to_string(),
        }
    }
}
