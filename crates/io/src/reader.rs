//! Sales dataset reading configuration and orchestration.

use std::path::Path;

use tracing::info;

use crate::csv_read;
use crate::error::IoError;
use crate::parquet_read;
use crate::sales::SalesTable;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading a long-format sales dataset.
///
/// Use the builder methods (`with_*`) to customise the hierarchy, item,
/// date and target column names. The [`Default`] implementation supplies
/// the M5-style names this pipeline is usually run against.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Hierarchy key column names, outermost level first.
    key_columns: Vec<String>,
    /// Column holding the item id.
    item_column: String,
    /// Column holding the observation date.
    date_column: String,
    /// Column holding the observed value.
    target_column: String,
    /// chrono format string for parsing date cells.
    date_format: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            key_columns: vec!["state_id".into(), "store_id".into()],
            item_column: "item_id".into(),
            date_column: "ds".into(),
            target_column: "y".into(),
            date_format: "%Y-%m-%d".into(),
        }
    }
}

impl ReaderConfig {
    /// Set the hierarchy key columns, outermost level first.
    pub fn with_key_columns(mut self, columns: Vec<String>) -> Self {
        self.key_columns = columns;
        self
    }

    /// Set the item id column name.
    pub fn with_item_column(mut self, name: impl Into<String>) -> Self {
        self.item_column = name.into();
        self
    }

    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Set the target value column name.
    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Set the chrono format string used to parse date cells.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Hierarchy key column names.
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Item id column name.
    pub fn item_column(&self) -> &str {
        &self.item_column
    }

    /// Date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Target value column name.
    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// chrono format string for date cells.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] when no key column is configured or
    /// when two configured columns share a name.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems: Vec<String> = Vec::new();

        if self.key_columns.is_empty() {
            problems.push("at least one hierarchy key column is required".to_string());
        }

        let mut names: Vec<&str> = self.key_columns.iter().map(String::as_str).collect();
        names.push(&self.item_column);
        names.push(&self.date_column);
        names.push(&self.target_column);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        for pair in sorted.windows(2) {
            if pair[0] == pair[1] {
                problems.push(format!("column '{}' configured twice", pair[0]));
            }
        }
        problems.dedup();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// read_sales
// ---------------------------------------------------------------------------

/// Read a sales dataset from `path`, dispatching on the file extension.
///
/// `.csv` files are parsed with headers via the csv crate; `.parquet` files
/// are read as Arrow record batches, where the date column may be either
/// `Date32` or a string in the configured date format and the target column
/// either `Float64` or `Int64`.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] / [`IoError::UnsupportedExtension`]
/// for path problems, [`IoError::MissingColumn`] / [`IoError::InvalidCell`]
/// for malformed content, and [`IoError::EmptyTable`] when no data rows
/// remain.
pub fn read_sales(path: &Path, config: &ReaderConfig) -> Result<SalesTable, IoError> {
    config.validate()?;

    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match extension.as_str() {
        "csv" => csv_read::read_csv(path, config)?,
        "parquet" => parquet_read::read_parquet(path, config)?,
        _ => {
            return Err(IoError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    };

    if table.is_empty() {
        return Err(IoError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    info!(
        rows = table.len(),
        items = table.item_ids().len(),
        path = %path.display(),
        "loaded sales table"
    );

    Ok(table)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
