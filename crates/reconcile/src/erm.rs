//! Empirical risk minimisation projection.
//!
//! ERM (Ben Taieb & Koo 2019) learns the projection directly: it picks
//! the `P` whose reconciled in-sample fit `S * P * fitted` is closest to
//! the training actuals in least squares, instead of deriving `P` from a
//! covariance model. A small ridge keeps the normal equations solvable
//! when the fitted-value Gram matrix is rank deficient.

use hermes_hierarchy::SummingMatrix;
use ndarray::{Array2, ArrayView2, Axis};

use crate::error::ReconcileError;
use crate::linalg::solve_spd;
use crate::residuals::complete_columns;

const RIDGE_SCALE: f64 = 1e-8;

/// Least-squares projection fitted on the training window.
///
/// `train` and `residuals` are `(n_series, n_train)` in hierarchy row
/// order; fitted values are recovered as `train - residuals` on the
/// complete residual columns.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when fewer than two
/// complete residual columns exist and [`ReconcileError::SingularSystem`]
/// when the ridge system cannot be factorised.
pub(crate) fn projection(
    summing: &SummingMatrix,
    train: ArrayView2<f64>,
    residuals: ArrayView2<f64>,
) -> Result<Array2<f64>, ReconcileError> {
    let cols = complete_columns(residuals);
    if cols.len() < 2 {
        return Err(ReconcileError::InsufficientResiduals {
            n: cols.len(),
            min: 2,
        });
    }
    let actual = train.select(Axis(1), &cols);
    let resid = residuals.select(Axis(1), &cols);
    let fitted = &actual - &resid;

    // Bottom-level representation of the actuals, (S'S)^-1 S' Y.
    let s = summing.values();
    let gram = s.t().dot(s);
    let rhs = s.t().dot(&actual);
    let bottom_actual = solve_spd(gram.view(), rhs.view(), "erm bottom projection")?;

    let n_total = summing.n_total();
    let mut ridge = fitted.dot(&fitted.t());
    let lambda = RIDGE_SCALE * ridge.diag().sum() / n_total as f64;
    for i in 0..n_total {
        ridge[[i, i]] += lambda;
    }
    let normal_rhs = fitted.dot(&bottom_actual.t());
    let p_t = solve_spd(ridge.view(), normal_rhs.view(), "erm normal equations")?;
    Ok(p_t.reversed_axes())
}
