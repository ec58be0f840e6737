//! Error types for hermes-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the hermes-io crate.
///
/// This enum covers plain I/O failures, format-specific errors from the CSV
/// and Parquet readers, cell-level parse failures, and the data-model
/// mismatches encountered when assembling, splitting or reordering frames.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a plain I/O error (directory creation, flushing a writer).
    #[error("i/o error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the csv crate.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying CSV failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet library.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the Arrow library.
    #[error("arrow error: {reason}")]
    Arrow {
        /// Description of the underlying Arrow failure.
        reason: String,
    },

    /// Returned for input paths whose extension is neither `.csv` nor
    /// `.parquet`.
    #[error("unsupported input extension for {} (expected .csv or .parquet)", path.display())]
    UnsupportedExtension {
        /// Path whose extension was not recognised.
        path: PathBuf,
    },

    /// Returned when a configured column is not present in the input file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when a cell cannot be parsed as its expected type.
    #[error("row {row}: cannot parse {column} value '{value}'")]
    InvalidCell {
        /// 1-based data row index (header excluded).
        row: usize,
        /// Column the cell belongs to.
        column: String,
        /// Offending cell content.
        value: String,
    },

    /// Returned when an input file contains no data rows.
    #[error("no data rows in {}", path.display())]
    EmptyTable {
        /// Path to the empty file.
        path: PathBuf,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when two series share an id within one frame.
    #[error("duplicate series id '{id}'")]
    DuplicateSeries {
        /// The repeated id.
        id: String,
    },

    /// Returned when a reorder target names a series the frame does not hold.
    #[error("unknown series id '{id}'")]
    UnknownSeries {
        /// The unmatched id.
        id: String,
    },

    /// Returned when a train/test split horizon does not fit the series.
    #[error("horizon {horizon} out of range for series of length {len}")]
    BadHorizon {
        /// Requested test-window length.
        horizon: usize,
        /// Number of observations available.
        len: usize,
    },
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Arrow {
            reason: e.to_string(),
        }
    }
}
