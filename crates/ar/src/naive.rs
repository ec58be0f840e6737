//! Naive (random walk) fallback forecaster.

use crate::error::ArError;
use crate::forecast::SeriesForecast;

/// A fitted naive forecaster: every future step repeats the final
/// observation, and the forecast error variance grows linearly with the
/// horizon as for a random walk.
///
/// This is the fallback when no AR candidate fits, which happens for the
/// short, constant or otherwise degenerate series that are common at the
/// bottom of a retail hierarchy.
#[derive(Clone, Debug)]
pub struct NaiveFit {
    last: f64,
    sigma2: f64,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl NaiveFit {
    /// Fits the naive forecaster to observed data.
    ///
    /// The one-step fitted value is the previous observation, so the
    /// residuals are the first differences; `sigma2` is their mean
    /// square. A single observation fits with `sigma2 = 0`.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArError::EmptyData`] | `data` is empty |
    /// | [`ArError::NonFiniteData`] | any element is NaN or infinite |
    pub fn new(data: &[f64]) -> Result<Self, ArError> {
        if data.is_empty() {
            return Err(ArError::EmptyData);
        }
        if data.iter().any(|x| !x.is_finite()) {
            return Err(ArError::NonFiniteData);
        }

        let n = data.len();
        let mut fitted = vec![f64::NAN; n];
        let mut residuals = vec![f64::NAN; n];
        let mut sum_sq = 0.0;
        for t in 1..n {
            fitted[t] = data[t - 1];
            let e = data[t] - data[t - 1];
            residuals[t] = e;
            sum_sq += e * e;
        }
        let sigma2 = if n > 1 { sum_sq / (n - 1) as f64 } else { 0.0 };

        Ok(Self {
            last: data[n - 1],
            sigma2,
            fitted,
            residuals,
        })
    }

    /// The final observation, repeated by every forecast step.
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Mean squared first difference.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// One-step fitted values (the lagged series). The first entry is NaN.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// One-step residuals (the first differences). The first entry is NaN.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Forecasts `horizon` steps ahead: a flat line at the last
    /// observation with variance `sigma2 * h` at step h.
    pub fn forecast(&self, horizon: usize) -> SeriesForecast {
        let mean = vec![self.last; horizon];
        let variance = (1..=horizon).map(|h| self.sigma2 * h as f64).collect();
        SeriesForecast::new(mean, variance)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn new_rejects_empty_data() {
        let err = NaiveFit::new(&[]).unwrap_err();
        assert!(matches!(err, ArError::EmptyData));
    }

    #[test]
    fn new_rejects_non_finite_data() {
        let err = NaiveFit::new(&[1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, ArError::NonFiniteData));
    }

    #[test]
    fn fitted_is_lagged_series() {
        let fit = NaiveFit::new(&[3.0, 5.0, 4.0]).unwrap();
        assert!(fit.fitted()[0].is_nan());
        assert_eq!(&fit.fitted()[1..], &[3.0, 5.0]);
        assert!(fit.residuals()[0].is_nan());
        assert_eq!(&fit.residuals()[1..], &[2.0, -1.0]);
    }

    #[test]
    fn sigma2_is_mean_squared_difference() {
        let fit = NaiveFit::new(&[3.0, 5.0, 4.0]).unwrap();
        // Differences 2 and -1: (4 + 1) / 2.
        assert_abs_diff_eq!(fit.sigma2(), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn single_observation_has_zero_variance() {
        let fit = NaiveFit::new(&[7.0]).unwrap();
        assert_eq!(fit.last(), 7.0);
        assert_eq!(fit.sigma2(), 0.0);
    }

    #[test]
    fn forecast_is_flat_with_linear_variance() {
        let fit = NaiveFit::new(&[3.0, 5.0, 4.0]).unwrap();
        let forecast = fit.forecast(3);
        assert_eq!(forecast.mean(), &[4.0, 4.0, 4.0]);
        assert_abs_diff_eq!(forecast.variance()[0], 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(forecast.variance()[1], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(forecast.variance()[2], 7.5, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_fits_cleanly() {
        let fit = NaiveFit::new(&[2.0, 2.0, 2.0]).unwrap();
        let forecast = fit.forecast(2);
        assert_eq!(forecast.mean(), &[2.0, 2.0]);
        assert_eq!(forecast.variance(), &[0.0, 0.0]);
    }
}
