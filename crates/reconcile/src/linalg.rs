//! Dense symmetric positive definite solves for the projection math.
//!
//! Every linear system the reconciliation methods produce is SPD (weight
//! matrices, Gram matrices, ridge-stabilised normal equations), so a
//! Cholesky factorisation with forward/back substitution covers all of
//! them without pulling in a LAPACK binding.

use ndarray::{Array2, ArrayView2};

use crate::error::ReconcileError;

/// Lower Cholesky factor of a symmetric positive definite matrix, or
/// `None` when a pivot is non-positive or non-finite.
pub(crate) fn cholesky(a: ArrayView2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return None;
    }
    let mut l = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut d = a[[j, j]];
        for k in 0..j {
            d -= l[[j, k]] * l[[j, k]];
        }
        if !d.is_finite() || d <= 0.0 {
            return None;
        }
        let pivot = d.sqrt();
        l[[j, j]] = pivot;
        for i in (j + 1)..n {
            let mut s = a[[i, j]];
            for k in 0..j {
                s -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = s / pivot;
        }
    }
    Some(l)
}

/// Solve `A X = B` for SPD `A` with any number of right-hand columns.
pub(crate) fn solve_spd(
    a: ArrayView2<f64>,
    b: ArrayView2<f64>,
    context: &str,
) -> Result<Array2<f64>, ReconcileError> {
    if b.nrows() != a.nrows() {
        return Err(ReconcileError::DimensionMismatch {
            name: format!("{context} rhs rows"),
            expected: a.nrows(),
            got: b.nrows(),
        });
    }
    let l = cholesky(a).ok_or_else(|| ReconcileError::SingularSystem {
        context: context.to_string(),
    })?;

    let n = l.nrows();
    let mut x = b.to_owned();
    for c in 0..x.ncols() {
        // L y = b, then L^T x = y.
        for i in 0..n {
            let mut s = x[[i, c]];
            for k in 0..i {
                s -= l[[i, k]] * x[[k, c]];
            }
            x[[i, c]] = s / l[[i, i]];
        }
        for i in (0..n).rev() {
            let mut s = x[[i, c]];
            for k in (i + 1)..n {
                s -= l[[k, i]] * x[[k, c]];
            }
            x[[i, c]] = s / l[[i, i]];
        }
    }
    Ok(x)
}
