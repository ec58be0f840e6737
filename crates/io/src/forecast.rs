//! Wide per-horizon forecast frames.

use chrono::NaiveDate;
use ndarray::{Array2, Axis};

use crate::error::IoError;
use crate::panel;

/// Column name of the unreconciled base forecast.
pub const BASE_COLUMN: &str = "base";

/// Render an interval level for a column name: integral levels drop the
/// fraction (`95`), others keep it (`97.5`).
pub fn format_level(level: f64) -> String {
    if level.fract() == 0.0 {
        format!("{level:.0}")
    } else {
        format!("{level}")
    }
}

/// Lower interval band column name, e.g. `bottom_up-lo-95`.
pub fn lo_column(method: &str, level: f64) -> String {
    format!("{method}-lo-{}", format_level(level))
}

/// Upper interval band column name, e.g. `bottom_up-hi-95`.
pub fn hi_column(method: &str, level: f64) -> String {
    format!("{method}-hi-{}", format_level(level))
}

/// A wide forecast frame: one named `(n_series, horizon)` matrix per value
/// column, over a shared id/date grid.
///
/// Column names follow the `method[-lo-L|-hi-L]` convention, e.g. `base`,
/// `base-lo-90`, `bottom_up`, `min_trace_shrink-hi-80`. Columns keep their
/// insertion order. The optional seed records which random seed produced
/// the frame, so several bootstrap repetitions can share one CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFrame {
    ids: Vec<String>,
    dates: Vec<NaiveDate>,
    columns: Vec<(String, Array2<f64>)>,
    seed: Option<u64>,
}

impl ForecastFrame {
    /// Create an empty frame over an id/date grid.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DuplicateSeries`] on repeated ids and
    /// [`IoError::Validation`] when the dates are not strictly increasing.
    pub fn new(ids: Vec<String>, dates: Vec<NaiveDate>) -> Result<Self, IoError> {
        // Reuse the panel checks by validating against an empty matrix.
        let probe = Array2::<f64>::zeros((ids.len(), dates.len()));
        let frame = panel::PanelFrame::new(ids, dates, probe)?;
        let (ids, dates, _) = frame.into_parts();
        Ok(Self {
            ids,
            dates,
            columns: Vec::new(),
            seed: None,
        })
    }

    /// Tag the frame with the seed that produced it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Append a named value column.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DimensionMismatch`] when the matrix shape does not
    /// match the frame grid and [`IoError::Validation`] on a repeated name.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Array2<f64>,
    ) -> Result<(), IoError> {
        let name = name.into();
        if values.nrows() != self.n_series() {
            return Err(IoError::DimensionMismatch {
                name: format!("column '{name}' series"),
                expected: self.n_series(),
                got: values.nrows(),
            });
        }
        if values.ncols() != self.horizon() {
            return Err(IoError::DimensionMismatch {
                name: format!("column '{name}' steps"),
                expected: self.horizon(),
                got: values.ncols(),
            });
        }
        if self.column(&name).is_some() {
            return Err(IoError::Validation {
                count: 1,
                details: format!("column '{name}' already present"),
            });
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Series ids in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Forecast dates (the test window).
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Seed that produced the frame, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of series (rows per column matrix).
    pub fn n_series(&self) -> usize {
        self.ids.len()
    }

    /// Number of forecast steps (columns per column matrix).
    pub fn horizon(&self) -> usize {
        self.dates.len()
    }

    /// Look up a value column by name.
    pub fn column(&self, name: &str) -> Option<&Array2<f64>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, m)| m)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// All named columns in insertion order.
    pub fn columns(&self) -> &[(String, Array2<f64>)] {
        &self.columns
    }

    /// Reorder rows of every column to `order`, which must be a permutation
    /// of the frame's ids.
    ///
    /// # Errors
    ///
    /// Same contract as [`crate::PanelFrame::reorder`].
    pub fn reorder(&self, order: &[String]) -> Result<ForecastFrame, IoError> {
        let perm = panel::permutation(&self.ids, order)?;
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values.select(Axis(0), &perm)))
            .collect();
        Ok(ForecastFrame {
            ids: order.to_vec(),
            dates: self.dates.clone(),
            columns,
            seed: self.seed,
        })
    }
}
