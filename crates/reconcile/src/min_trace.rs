//! Minimum-trace projections.
//!
//! MinT picks the projection minimising the trace of the reconciled
//! forecast error covariance under a working covariance `W`:
//! `P = (S' W^-1 S)^-1 S' W^-1` (Wickramasuriya et al. 2019). The three
//! variants differ only in `W`: the identity (OLS), the diagonal of
//! per-series residual variances (WLS), or the shrunk residual
//! covariance (shrink).

use hermes_hierarchy::SummingMatrix;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::error::ReconcileError;
use crate::linalg::solve_spd;
use crate::shrink::shrunk_covariance;

/// MinT projection under an identity covariance, `P = (S'S)^-1 S'`.
pub(crate) fn ols(summing: &SummingMatrix) -> Result<Array2<f64>, ReconcileError> {
    let weights = vec![1.0; summing.n_total()];
    diagonal_projection(summing, &weights, "min_trace_ols gram matrix")
}

/// MinT projection weighted by per-series residual variances.
///
/// Each series' weight is the sample variance of its own finite
/// residuals, so series with noisy base forecasts contribute less to
/// the reconciled combination.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when a series has
/// fewer than two finite residuals and [`ReconcileError::SingularSystem`]
/// when a residual variance is zero.
pub(crate) fn wls_var(
    summing: &SummingMatrix,
    residuals: ArrayView2<f64>,
) -> Result<Array2<f64>, ReconcileError> {
    let mut weights = Vec::with_capacity(residuals.nrows());
    for row in residuals.rows() {
        let values: Vec<f64> = row.iter().copied().collect();
        let variance = hermes_stats::finite_variance(&values).ok_or_else(|| {
            ReconcileError::InsufficientResiduals {
                n: values.iter().filter(|v| v.is_finite()).count(),
                min: 2,
            }
        })?;
        if !variance.is_finite() || variance <= 0.0 {
            return Err(ReconcileError::SingularSystem {
                context: "min_trace_wls_var weight matrix".to_string(),
            });
        }
        weights.push(variance);
    }
    diagonal_projection(summing, &weights, "min_trace_wls_var gram matrix")
}

/// MinT projection under the shrunk residual covariance.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when fewer than two
/// complete residual columns exist and [`ReconcileError::SingularSystem`]
/// when the shrunk covariance or the Gram matrix cannot be factorised.
pub(crate) fn shrink(
    summing: &SummingMatrix,
    residuals: ArrayView2<f64>,
) -> Result<Array2<f64>, ReconcileError> {
    let (weight, lambda) = shrunk_covariance(residuals)?;
    debug!(lambda, "estimated shrinkage intensity");
    let winv_s = solve_spd(
        weight.view(),
        summing.values().view(),
        "min_trace_shrink weight matrix",
    )?;
    let gram = summing.values().t().dot(&winv_s);
    solve_spd(gram.view(), winv_s.t(), "min_trace_shrink gram matrix")
}

/// `P` for a diagonal `W`, obtained by scaling the rows of `S` by the
/// inverse weights.
fn diagonal_projection(
    summing: &SummingMatrix,
    weights: &[f64],
    context: &str,
) -> Result<Array2<f64>, ReconcileError> {
    let s = summing.values();
    let mut winv_s = s.to_owned();
    for (mut row, &w) in winv_s.rows_mut().into_iter().zip(weights) {
        row.mapv_inplace(|v| v / w);
    }
    let gram = s.t().dot(&winv_s);
    solve_spd(gram.view(), winv_s.t(), context)
}
