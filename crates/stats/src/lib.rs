//! Statistical helper functions shared across the hermes workspace.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Mean over the finite entries of a slice. `None` when no entry is finite.
pub fn finite_mean(data: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for &x in data {
        if x.is_finite() {
            sum += x;
            n += 1;
        }
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

/// Sample variance with N-1 denominator (matching R's `var()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n as f64 - 1.0)
}

/// Sample variance over the finite entries. `None` when fewer than two are finite.
pub fn finite_variance(data: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    Some(variance(&finite))
}

/// Sample standard deviation with N-1 denominator (matching R's `sd()`).
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Biased sample autocovariance at lag `k` (1/N denominator).
///
/// The biased normalisation keeps the autocovariance sequence positive
/// semi-definite, which the Levinson-Durbin recursion requires. Returns 0.0
/// when `k >= data.len()`.
pub fn autocovariance(data: &[f64], k: usize) -> f64 {
    let n = data.len();
    if n == 0 || k >= n {
        return 0.0;
    }
    let m = mean(data);
    let mut acc = 0.0;
    for t in k..n {
        acc += (data[t] - m) * (data[t - k] - m);
    }
    acc / n as f64
}

/// R's default quantile algorithm (type=7).
///
/// **Expects pre-sorted input** (caller's responsibility). `p` is clamped
/// to [0, 1].
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn quantile_type7(sorted: &[f64], p: f64) -> f64 {
    assert!(
        !sorted.is_empty(),
        "quantile_type7: input must not be empty"
    );
    let p = p.clamp(0.0, 1.0);
    let n = sorted.len();
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - h.floor()) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_finite_mean_skips_nan() {
        let data = [f64::NAN, 1.0, f64::NAN, 3.0];
        assert_relative_eq!(finite_mean(&data).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_finite_mean_all_nan() {
        assert!(finite_mean(&[f64::NAN, f64::NAN]).is_none());
        assert!(finite_mean(&[]).is_none());
    }

    #[test]
    fn test_variance_matches_r() {
        // R: var(c(2, 4, 4, 4, 5, 5, 7, 9)) = 4.571429
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(variance(&data), 4.571429, epsilon = 1e-6);
    }

    #[test]
    fn test_variance_short_inputs() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[5.0]), 0.0);
    }

    #[test]
    fn test_variance_two() {
        // [3.0, 7.0]: mean=5, sum_sq=8, var=8/1=8
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_finite_variance_skips_nan_head() {
        // Finite tail {2, 4, 6}: var = 4
        let data = [f64::NAN, f64::NAN, 2.0, 4.0, 6.0];
        assert_relative_eq!(finite_variance(&data).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_finite_variance_too_few() {
        assert!(finite_variance(&[f64::NAN, 1.0]).is_none());
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
    }

    #[test]
    fn test_sd_single() {
        assert_eq!(sd(&[5.0]), 0.0);
    }

    #[test]
    fn test_autocovariance_lag_zero() {
        // gamma(0) is the biased variance: var * (n-1)/n.
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let expected = variance(&data) * 4.0 / 5.0;
        assert_relative_eq!(autocovariance(&data, 0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_autocovariance_alternating_series() {
        // Alternating +1/-1: gamma(1)/gamma(0) = -(n-1)/n.
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let g0 = autocovariance(&data, 0);
        let g1 = autocovariance(&data, 1);
        assert!(g0 > 0.0);
        assert!(g1 < 0.0);
        assert_relative_eq!(g1 / g0, -5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_autocovariance_lag_out_of_range() {
        assert_eq!(autocovariance(&[1.0, 2.0], 2), 0.0);
        assert_eq!(autocovariance(&[], 0), 0.0);
    }

    #[test]
    fn test_quantile_type7_p0() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_type7(&sorted, 0.0), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quantile_type7_p1() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(quantile_type7(&sorted, 1.0), 5.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quantile_type7_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        // p=0.1 → h=0.4, lo=0, hi=1 → 1 + 0.4*(2-1) = 1.4
        assert_relative_eq!(quantile_type7(&sorted, 0.1), 1.4, epsilon = 1e-10);
    }

    #[test]
    fn test_quantile_type7_r_crossvalidation() {
        // R: quantile(1:10, 0.3, type=7) = 3.7
        let sorted: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_relative_eq!(quantile_type7(&sorted, 0.3), 3.7, epsilon = 1e-10);
    }

    #[test]
    fn test_quantile_type7_clamps_p() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(quantile_type7(&sorted, -0.5), 1.0);
        assert_eq!(quantile_type7(&sorted, 1.5), 3.0);
    }

    #[test]
    #[should_panic(expected = "quantile_type7: input must not be empty")]
    fn test_quantile_type7_empty_panics() {
        quantile_type7(&[], 0.5);
    }
}
