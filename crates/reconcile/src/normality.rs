//! Gaussian prediction intervals.
//!
//! Under a normality assumption the reconciled forecast variance follows
//! from the base variances and the combination weights alone: with
//! `M = S * P`, `Var(rec_i) = sum_k M_ik^2 * sigma_k^2` per step. Bands
//! are symmetric around the point forecast and independent of any seed.

use ndarray::{Array2, ArrayView2};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ReconcileError;

/// Standard normal distribution for interval z-values.
pub(crate) fn standard_normal() -> Result<Normal, ReconcileError> {
    Normal::new(0.0, 1.0).map_err(|e| ReconcileError::Distribution {
        reason: e.to_string(),
    })
}

/// Per-step standard deviation of the combined forecasts.
///
/// `combination` is `S * P`, `(n_series, n_series)`; `sigma` holds the
/// base standard deviations, `(n_series, horizon)`. Base forecast errors
/// are treated as independent across series.
pub(crate) fn projected_sigma(
    combination: ArrayView2<f64>,
    sigma: ArrayView2<f64>,
) -> Array2<f64> {
    let weights_sq = combination.mapv(|v| v * v);
    let sigma_sq = sigma.mapv(|v| v * v);
    weights_sq.dot(&sigma_sq).mapv(f64::sqrt)
}

/// Symmetric central bands `point -+ z * sigma` for each level.
///
/// # Errors
///
/// Returns [`ReconcileError::Distribution`] when the standard normal
/// cannot be constructed.
pub(crate) fn bands_from_sigma(
    point: ArrayView2<f64>,
    sigma: ArrayView2<f64>,
    levels: &[f64],
) -> Result<Vec<(f64, Array2<f64>, Array2<f64>)>, ReconcileError> {
    let normal = standard_normal()?;
    let mut bands = Vec::with_capacity(levels.len());
    for &level in levels {
        let z = normal.inverse_cdf(0.5 + level / 200.0);
        let spread = sigma.mapv(|s| s * z);
        let lo = &point - &spread;
        let hi = &point + &spread;
        bands.push((level, lo, hi));
    }
    Ok(bands)
}
