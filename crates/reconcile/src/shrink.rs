//! Schaefer-Strimmer covariance shrinkage.
//!
//! The MinT(shrink) weight matrix is a convex combination of the sample
//! residual covariance and its diagonal, with the shrinkage intensity
//! estimated from the data itself (Schaefer & Strimmer 2005). Shrinking
//! towards the diagonal keeps the weight matrix well conditioned when the
//! number of series approaches or exceeds the number of residual columns.

use ndarray::{Array2, ArrayView2};

use crate::error::ReconcileError;
use crate::residuals::complete_submatrix;

/// Shrunk residual covariance together with the estimated intensity.
///
/// Only complete residual columns enter the estimate. The intensity is
/// `lambda = sum Var(s_ij) / sum s_ij^2` over the off-diagonal entries,
/// clamped to `[0, 1]`, and the result is
/// `W = lambda * diag(S) + (1 - lambda) * S`.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when fewer than two
/// complete residual columns exist.
pub(crate) fn shrunk_covariance(
    residuals: ArrayView2<f64>,
) -> Result<(Array2<f64>, f64), ReconcileError> {
    let mut centered = complete_submatrix(residuals, 2)?;
    let (n, m) = centered.dim();
    let mf = m as f64;
    for mut row in centered.rows_mut() {
        let mean = row.sum() / mf;
        row.mapv_inplace(|v| v - mean);
    }

    let cov = centered.dot(&centered.t()) / (mf - 1.0);

    // Off-diagonal sums for the intensity estimate. The variance of a
    // sample covariance entry is m / (m - 1)^3 times the spread of the
    // per-step products around their mean.
    let var_scale = mf / (mf - 1.0).powi(3);
    let mut var_sum = 0.0;
    let mut cov_sq_sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let mut product_mean = 0.0;
            for t in 0..m {
                product_mean += centered[[i, t]] * centered[[j, t]];
            }
            product_mean /= mf;
            let mut product_var = 0.0;
            for t in 0..m {
                let w = centered[[i, t]] * centered[[j, t]] - product_mean;
                product_var += w * w;
            }
            var_sum += var_scale * product_var;
            cov_sq_sum += cov[[i, j]] * cov[[i, j]];
        }
    }

    let lambda = if cov_sq_sum > 0.0 {
        (var_sum / cov_sq_sum).clamp(0.0, 1.0)
    } else {
        1.0
    };

    let mut shrunk = cov.mapv(|v| v * (1.0 - lambda));
    for i in 0..n {
        shrunk[[i, i]] = cov[[i, i]];
    }
    Ok((shrunk, lambda))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn two_columns_give_zero_intensity() {
        // With two complete columns every per-step product equals its
        // mean, so the variance estimate vanishes and W is the sample
        // covariance itself.
        let residuals = array![[1.0, -1.0], [2.0, -2.0]];
        let (w, lambda) = shrunk_covariance(residuals.view()).unwrap();
        assert_abs_diff_eq!(lambda, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[[0, 0]], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[[0, 1]], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(w[[1, 1]], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn diagonal_is_preserved() {
        let residuals = array![
            [0.3, -1.2, 0.9, -0.4, 0.6],
            [-0.8, 0.5, -0.1, 1.1, -0.7]
        ];
        let (w, lambda) = shrunk_covariance(residuals.view()).unwrap();
        assert!((0.0..=1.0).contains(&lambda));
        let mut centered = residuals.clone();
        for mut row in centered.rows_mut() {
            let mean = row.sum() / 5.0;
            row.mapv_inplace(|v| v - mean);
        }
        let cov = centered.dot(&centered.t()) / 4.0;
        assert_abs_diff_eq!(w[[0, 0]], cov[[0, 0]], epsilon = 1e-12);
        assert_abs_diff_eq!(w[[1, 1]], cov[[1, 1]], epsilon = 1e-12);
        assert!(w[[0, 1]].abs() <= cov[[0, 1]].abs() + 1e-12);
    }

    #[test]
    fn shrunk_matrix_is_symmetric() {
        let residuals = array![
            [0.2, -0.4, 1.3, 0.8, -0.9, 0.1],
            [1.0, 0.3, -0.2, -1.1, 0.4, 0.6],
            [-0.5, 0.9, 0.7, -0.3, 1.2, -0.8]
        ];
        let (w, _) = shrunk_covariance(residuals.view()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(w[[i, j]], w[[j, i]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn nan_columns_are_excluded() {
        let with_nan = array![
            [f64::NAN, 1.0, -1.0],
            [0.5, 2.0, -2.0]
        ];
        let clean = array![[1.0, -1.0], [2.0, -2.0]];
        let (w_nan, l_nan) = shrunk_covariance(with_nan.view()).unwrap();
        let (w_clean, l_clean) = shrunk_covariance(clean.view()).unwrap();
        assert_abs_diff_eq!(l_nan, l_clean, epsilon = 1e-12);
        assert_abs_diff_eq!(w_nan[[0, 1]], w_clean[[0, 1]], epsilon = 1e-12);
    }

    #[test]
    fn single_complete_column_is_rejected() {
        let residuals = array![[f64::NAN, 1.0], [0.5, 2.0]];
        let err = shrunk_covariance(residuals.view()).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InsufficientResiduals { n: 1, min: 2 }
        ));
    }

    #[test]
    fn single_series_shrinks_to_its_variance() {
        let residuals = array![[0.4, -0.6, 1.1, -0.9]];
        let (w, lambda) = shrunk_covariance(residuals.view()).unwrap();
        assert_abs_diff_eq!(lambda, 1.0, epsilon = 1e-12);
        assert_eq!(w.dim(), (1, 1));
        assert!(w[[0, 0]] > 0.0);
    }
}
