//! Shared residual-matrix helpers.
//!
//! In-sample residuals arrive as an `(n_series, n_train)` matrix whose
//! leading entries are NaN where a model has no complete lag window. The
//! joint operations here only use complete columns, i.e. time steps where
//! every series has a finite residual.

use ndarray::{Array2, ArrayView2, Axis};

use crate::error::ReconcileError;

/// Indices of columns where every series has a finite residual.
pub(crate) fn complete_columns(residuals: ArrayView2<f64>) -> Vec<usize> {
    (0..residuals.ncols())
        .filter(|&t| residuals.column(t).iter().all(|v| v.is_finite()))
        .collect()
}

/// The residual matrix restricted to its complete columns.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when fewer than
/// `min` complete columns exist.
pub(crate) fn complete_submatrix(
    residuals: ArrayView2<f64>,
    min: usize,
) -> Result<Array2<f64>, ReconcileError> {
    let cols = complete_columns(residuals);
    if cols.len() < min {
        return Err(ReconcileError::InsufficientResiduals { n: cols.len(), min });
    }
    Ok(residuals.select(Axis(1), &cols))
}
