//! Static top-down projections.
//!
//! Both variants disaggregate the top-level forecast with proportions
//! estimated from the training window, so only column 0 of the projection
//! is populated. Reconciled forecasts for every series then follow the
//! top-level base forecast scaled by the fixed proportion vector.

use hermes_hierarchy::SummingMatrix;
use ndarray::{Array2, ArrayView2};

use crate::error::ReconcileError;

/// Average of the per-step shares `y_bt / top_t`, skipping steps where
/// the top level is zero.
///
/// # Errors
///
/// Returns [`ReconcileError::DegenerateTopLevel`] when the top-level
/// series is zero at every training step.
pub(crate) fn average_proportions(
    summing: &SummingMatrix,
    train: ArrayView2<f64>,
) -> Result<Array2<f64>, ReconcileError> {
    let bottom = train.slice(ndarray::s![summing.bottom_range(), ..]);
    let top = train.row(0);
    let mut proportions = vec![0.0; summing.n_bottom()];
    let mut used = 0usize;
    for (t, &total) in top.iter().enumerate() {
        if total == 0.0 {
            continue;
        }
        used += 1;
        for (b, share) in proportions.iter_mut().enumerate() {
            *share += bottom[[b, t]] / total;
        }
    }
    if used == 0 {
        return Err(ReconcileError::DegenerateTopLevel);
    }
    for share in &mut proportions {
        *share /= used as f64;
    }
    Ok(projection_from_proportions(&proportions, summing.n_total()))
}

/// Share of each bottom series' mean in the summed bottom means.
///
/// # Errors
///
/// Returns [`ReconcileError::DegenerateTopLevel`] when the bottom means
/// sum to zero.
pub(crate) fn proportion_averages(
    summing: &SummingMatrix,
    train: ArrayView2<f64>,
) -> Result<Array2<f64>, ReconcileError> {
    let bottom = train.slice(ndarray::s![summing.bottom_range(), ..]);
    let n_train = bottom.ncols() as f64;
    let means: Vec<f64> = bottom.rows().into_iter().map(|r| r.sum() / n_train).collect();
    let total: f64 = means.iter().sum();
    if total == 0.0 {
        return Err(ReconcileError::DegenerateTopLevel);
    }
    let proportions: Vec<f64> = means.iter().map(|m| m / total).collect();
    Ok(projection_from_proportions(&proportions, summing.n_total()))
}

fn projection_from_proportions(proportions: &[f64], n_total: usize) -> Array2<f64> {
    let mut p = Array2::zeros((proportions.len(), n_total));
    for (b, &share) in proportions.iter().enumerate() {
        p[[b, 0]] = share;
    }
    p
}
