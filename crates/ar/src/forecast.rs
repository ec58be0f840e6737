//! Point forecasts with forecast-error variances.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ArError;

/// A multi-step forecast for a single series: one point forecast and one
/// forecast-error variance per step.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesForecast {
    mean: Vec<f64>,
    variance: Vec<f64>,
}

impl SeriesForecast {
    pub(crate) fn new(mean: Vec<f64>, variance: Vec<f64>) -> Self {
        Self { mean, variance }
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.mean.len()
    }

    /// Point forecasts, one per step.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Forecast-error variances, one per step.
    pub fn variance(&self) -> &[f64] {
        &self.variance
    }

    /// Forecast-error standard deviations, one per step.
    pub fn sigma(&self) -> Vec<f64> {
        self.variance.iter().map(|v| v.max(0.0).sqrt()).collect()
    }

    /// Central Gaussian prediction interval at the given level (percent).
    ///
    /// Returns `(lower, upper)` bounds per step, with
    /// `lower = mean - z * sigma` and `upper = mean + z * sigma` where z
    /// is the standard normal quantile at `1 - (1 - level/100) / 2`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArError::InvalidLevel`] | `level` outside the open (0, 100) range |
    pub fn interval(&self, level: f64) -> Result<(Vec<f64>, Vec<f64>), ArError> {
        if !level.is_finite() || level <= 0.0 || level >= 100.0 {
            return Err(ArError::InvalidLevel { level });
        }
        let normal = standard_normal()?;
        let alpha = 1.0 - level / 100.0;
        let z = normal.inverse_cdf(1.0 - alpha / 2.0);

        let sigma = self.sigma();
        let lower = self
            .mean
            .iter()
            .zip(&sigma)
            .map(|(m, s)| m - z * s)
            .collect();
        let upper = self
            .mean
            .iter()
            .zip(&sigma)
            .map(|(m, s)| m + z * s)
            .collect();
        Ok((lower, upper))
    }
}

/// Build the standard normal distribution used for interval quantiles.
pub(crate) fn standard_normal() -> Result<Normal, ArError> {
    Normal::new(0.0, 1.0).map_err(|e| ArError::Distribution {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn sigma_is_square_root_of_variance() {
        let forecast = SeriesForecast::new(vec![1.0, 2.0], vec![4.0, 9.0]);
        assert_eq!(forecast.sigma(), vec![2.0, 3.0]);
    }

    #[test]
    fn interval_95_uses_known_quantile() {
        let forecast = SeriesForecast::new(vec![10.0], vec![4.0]);
        let (lower, upper) = forecast.interval(95.0).unwrap();
        // z_{0.975} = 1.959964 (R: qnorm(0.975)).
        assert_abs_diff_eq!(lower[0], 10.0 - 1.959964 * 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(upper[0], 10.0 + 1.959964 * 2.0, epsilon = 1e-5);
    }

    #[test]
    fn interval_is_symmetric_around_mean() {
        let forecast = SeriesForecast::new(vec![5.0, -3.0], vec![1.0, 2.0]);
        let (lower, upper) = forecast.interval(80.0).unwrap();
        for i in 0..2 {
            assert_abs_diff_eq!(
                (lower[i] + upper[i]) / 2.0,
                forecast.mean()[i],
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn wider_level_gives_wider_interval() {
        let forecast = SeriesForecast::new(vec![0.0], vec![1.0]);
        let (lo_80, hi_80) = forecast.interval(80.0).unwrap();
        let (lo_95, hi_95) = forecast.interval(95.0).unwrap();
        assert!(lo_95[0] < lo_80[0]);
        assert!(hi_95[0] > hi_80[0]);
    }

    #[test]
    fn interval_rejects_out_of_range_levels() {
        let forecast = SeriesForecast::new(vec![0.0], vec![1.0]);
        for level in [0.0, 100.0, -5.0, f64::NAN] {
            let err = forecast.interval(level).unwrap_err();
            assert!(matches!(err, ArError::InvalidLevel { .. }));
        }
    }

    #[test]
    fn zero_variance_collapses_interval() {
        let forecast = SeriesForecast::new(vec![3.0], vec![0.0]);
        let (lower, upper) = forecast.interval(95.0).unwrap();
        assert_eq!(lower[0], 3.0);
        assert_eq!(upper[0], 3.0);
    }
}
