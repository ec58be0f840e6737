//! Bootstrap sample paths for prediction intervals.
//!
//! Future paths are the base mean plus residual columns resampled with
//! replacement from the complete columns of the in-sample residual
//! matrix. Drawing whole columns keeps the cross-series error structure
//! intact, so a projected path stays as coherent as the projection makes
//! it. One set of draws per seed is shared by every reconciliation
//! method, which keeps the methods comparable sample by sample.

use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::ReconcileError;
use crate::residuals::complete_submatrix;

/// Resampled base paths, one `(n_series, horizon)` matrix per sample.
///
/// # Errors
///
/// Returns [`ReconcileError::InsufficientResiduals`] when fewer than two
/// complete residual columns exist.
pub(crate) fn base_paths(
    mean: ArrayView2<f64>,
    residuals: ArrayView2<f64>,
    num_samples: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Array2<f64>>, ReconcileError> {
    let complete = complete_submatrix(residuals, 2)?;
    let m = complete.ncols();
    let horizon = mean.ncols();
    let mut samples = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let mut path = mean.to_owned();
        for t in 0..horizon {
            let draw = rng.random_range(0..m);
            path.column_mut(t).scaled_add(1.0, &complete.column(draw));
        }
        samples.push(path);
    }
    Ok(samples)
}

/// Central interval bands over a set of sample paths.
///
/// For a level `l` the band spans the type-7 quantiles at
/// `(1 - l/100) / 2` and `1 - (1 - l/100) / 2`, computed per series and
/// step. `samples` must be non-empty and share one shape.
pub(crate) fn quantile_bands(
    samples: &[Array2<f64>],
    levels: &[f64],
) -> Vec<(f64, Array2<f64>, Array2<f64>)> {
    let (n_series, horizon) = samples[0].dim();
    let mut bands = Vec::with_capacity(levels.len());
    for &level in levels {
        let lo_p = (1.0 - level / 100.0) / 2.0;
        let hi_p = 1.0 - lo_p;
        let mut lo = Array2::zeros((n_series, horizon));
        let mut hi = Array2::zeros((n_series, horizon));
        let mut values = vec![0.0; samples.len()];
        for i in 0..n_series {
            for t in 0..horizon {
                for (slot, sample) in values.iter_mut().zip(samples) {
                    *slot = sample[[i, t]];
                }
                values.sort_unstable_by(f64::total_cmp);
                lo[[i, t]] = hermes_stats::quantile_type7(&values, lo_p);
                hi[[i, t]] = hermes_stats::quantile_type7(&values, hi_p);
            }
        }
        bands.push((level, lo, hi));
    }
    bands
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn reproducible() {
        let mean = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let residuals = array![
            [0.1, -0.2, 0.3, -0.1],
            [-0.3, 0.2, -0.1, 0.4]
        ];
        let mut rng1 = StdRng::seed_from_u64(99);
        let paths1 = base_paths(mean.view(), residuals.view(), 5, &mut rng1).unwrap();
        let mut rng2 = StdRng::seed_from_u64(99);
        let paths2 = base_paths(mean.view(), residuals.view(), 5, &mut rng2).unwrap();
        assert_eq!(paths1, paths2);
    }

    #[test]
    fn different_seeds_differ() {
        let mean = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let residuals = array![
            [0.1, -0.2, 0.3, -0.1],
            [-0.3, 0.2, -0.1, 0.4]
        ];
        let mut rng1 = StdRng::seed_from_u64(1);
        let paths1 = base_paths(mean.view(), residuals.view(), 20, &mut rng1).unwrap();
        let mut rng2 = StdRng::seed_from_u64(9999);
        let paths2 = base_paths(mean.view(), residuals.view(), 20, &mut rng2).unwrap();
        assert_ne!(paths1, paths2);
    }

    #[test]
    fn identical_residual_columns_shift_the_mean() {
        // Every column of the residual matrix is the same, so each path
        // is the mean plus that column regardless of the draws.
        let mean = array![[1.0, 2.0], [3.0, 4.0]];
        let residuals = array![[0.5, 0.5, 0.5], [-0.5, -0.5, -0.5]];
        let mut rng = StdRng::seed_from_u64(7);
        let paths = base_paths(mean.view(), residuals.view(), 3, &mut rng).unwrap();
        for path in &paths {
            assert_eq!(*path, array![[1.5, 2.5], [3.5, 4.5]]);
        }
    }

    #[test]
    fn needs_two_complete_columns() {
        let mean = array![[1.0], [2.0]];
        let residuals = array![[f64::NAN, 0.1], [0.2, 0.3]];
        let mut rng = StdRng::seed_from_u64(0);
        let err = base_paths(mean.view(), residuals.view(), 4, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::InsufficientResiduals { n: 1, min: 2 }
        ));
    }

    #[test]
    fn bands_match_type7_quantiles() {
        // Ten samples taking values 1..=10 at the single cell: the 80%
        // band spans the 0.1 and 0.9 quantiles.
        let samples: Vec<Array2<f64>> =
            (1..=10).map(|v| array![[v as f64]]).collect();
        let bands = quantile_bands(&samples, &[80.0]);
        assert_eq!(bands.len(), 1);
        let (level, lo, hi) = &bands[0];
        assert_abs_diff_eq!(*level, 80.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lo[[0, 0]], 1.9, epsilon = 1e-12);
        assert_abs_diff_eq!(hi[[0, 0]], 9.1, epsilon = 1e-12);
    }

    #[test]
    fn wider_level_gives_wider_bands() {
        let samples: Vec<Array2<f64>> =
            (0..50).map(|v| array![[v as f64 * 0.3]]).collect();
        let bands = quantile_bands(&samples, &[80.0, 95.0]);
        let (_, lo80, hi80) = &bands[0];
        let (_, lo95, hi95) = &bands[1];
        assert!(lo95[[0, 0]] <= lo80[[0, 0]]);
        assert!(hi95[[0, 0]] >= hi80[[0, 0]]);
        assert!(lo80[[0, 0]] <= hi80[[0, 0]]);
    }
}
