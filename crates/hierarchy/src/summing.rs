//! The summing matrix S mapping bottom series to every aggregate.

use std::ops::Range;

use ndarray::Array2;

use crate::error::HierarchyError;

/// The summing matrix S of a hierarchy: shape `(n_total, n_bottom)` with
/// 0/1 entries, one row per series in canonical order. Row `i` marks the
/// bottom series whose sum is series `i`; the final `n_bottom` rows form
/// an identity block so bottom series map to themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct SummingMatrix {
    values: Array2<f64>,
}

impl SummingMatrix {
    /// Validate and wrap a summing matrix.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::InvalidSumming`] when the matrix is
    /// degenerate (no rows or columns, more columns than rows), an entry
    /// is not 0 or 1, a row is all-zero, or the trailing block is not the
    /// identity.
    pub fn new(values: Array2<f64>) -> Result<Self, HierarchyError> {
        let (n_total, n_bottom) = values.dim();
        if n_bottom == 0 || n_total < n_bottom {
            return Err(HierarchyError::InvalidSumming {
                details: format!("degenerate shape ({n_total}, {n_bottom})"),
            });
        }

        for ((i, j), &v) in values.indexed_iter() {
            if v != 0.0 && v != 1.0 {
                return Err(HierarchyError::InvalidSumming {
                    details: format!("entry ({i}, {j}) is {v}, expected 0 or 1"),
                });
            }
        }

        for (i, row) in values.rows().into_iter().enumerate() {
            if row.iter().all(|&v| v == 0.0) {
                return Err(HierarchyError::InvalidSumming {
                    details: format!("row {i} is all-zero"),
                });
            }
        }

        let first_bottom = n_total - n_bottom;
        for b in 0..n_bottom {
            for j in 0..n_bottom {
                let expected = if b == j { 1.0 } else { 0.0 };
                if values[[first_bottom + b, j]] != expected {
                    return Err(HierarchyError::InvalidSumming {
                        details: format!(
                            "bottom block is not the identity at ({}, {j})",
                            first_bottom + b
                        ),
                    });
                }
            }
        }

        Ok(Self { values })
    }

    /// The `(n_total, n_bottom)` matrix.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Total number of series (rows).
    pub fn n_total(&self) -> usize {
        self.values.nrows()
    }

    /// Number of bottom series (columns).
    pub fn n_bottom(&self) -> usize {
        self.values.ncols()
    }

    /// Row range of the bottom block in canonical order.
    pub fn bottom_range(&self) -> Range<usize> {
        (self.n_total() - self.n_bottom())..self.n_total()
    }
}
