//! Fitted AR model results.

use crate::forecast::SeriesForecast;
use crate::spec::ArSpec;

/// A fitted AR(p) model produced by [`ArSpec::fit()`].
///
/// Contains the estimated AR coefficients (`phi`), the sample mean the
/// data was centred on, innovation variance (`sigma2`), one-step fitted
/// values and residuals, and the Gaussian log-likelihood. Use accessors
/// to inspect results or call [`ArFit::forecast()`] to extend the series.
///
/// # Typestate Workflow
///
/// ```mermaid
/// graph LR
///     B["ArFit"] --> C[".phi() — AR coefficients"]
///     B --> D[".sigma2() — innovation variance"]
///     B --> E[".aic() — Akaike Information Criterion"]
///     B --> F[".forecast(horizon)"]
/// ```
#[derive(Clone, Debug)]
pub struct ArFit {
    spec: ArSpec,
    mean: f64,
    phi: Vec<f64>,
    sigma2: f64,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    log_likelihood: f64,
    /// Final p centred observations, oldest first.
    tail: Vec<f64>,
}

impl ArFit {
    /// Creates a new `ArFit` (crate-internal constructor).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        spec: ArSpec,
        mean: f64,
        phi: Vec<f64>,
        sigma2: f64,
        fitted: Vec<f64>,
        residuals: Vec<f64>,
        log_likelihood: f64,
        tail: Vec<f64>,
    ) -> Self {
        Self {
            spec,
            mean,
            phi,
            sigma2,
            fitted,
            residuals,
            log_likelihood,
            tail,
        }
    }

    /// Returns the [`ArSpec`] that produced this fit.
    pub fn spec(&self) -> ArSpec {
        self.spec
    }

    /// Returns the AR coefficients (`phi`).
    pub fn phi(&self) -> &[f64] {
        &self.phi
    }

    /// Returns the estimated mean of the data used to fit this model.
    ///
    /// The AR model is fitted to the centred data (observations minus
    /// mean). Forecasts from [`ArFit::forecast()`] have this mean added
    /// back.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the innovation variance (`sigma2`), re-estimated from the
    /// conditional residuals.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Returns the one-step fitted values. The first p entries are NaN.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Returns the one-step residuals. The first p entries are NaN.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Returns the Gaussian log-likelihood of the conditional residuals.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Computes the Akaike Information Criterion (AIC) for this fit.
    ///
    /// AIC = 2k - 2 * log_likelihood, where k = p + 1 (AR coefficients
    /// plus the innovation variance). Lower AIC indicates a better
    /// trade-off between fit and complexity.
    pub fn aic(&self) -> f64 {
        let k = (self.spec.p() + 1) as f64;
        2.0 * k - 2.0 * self.log_likelihood
    }

    /// Forecasts `horizon` steps ahead.
    ///
    /// The point forecast iterates the AR recursion on the centred
    /// history, feeding forecasts back in as they appear. The forecast
    /// error variance accumulates the squared psi weights of the
    /// implied moving-average expansion, so it is non-decreasing in the
    /// horizon.
    pub fn forecast(&self, horizon: usize) -> SeriesForecast {
        let p = self.phi.len();
        let mut window = self.tail.clone();
        let mut mean = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let mut m = 0.0;
            for (i, &coefficient) in self.phi.iter().enumerate() {
                m += coefficient * window[window.len() - 1 - i];
            }
            window.push(m);
            mean.push(m + self.mean);
        }

        let mut psi = vec![0.0; horizon];
        if horizon > 0 {
            psi[0] = 1.0;
        }
        for j in 1..horizon {
            let mut weight = 0.0;
            for i in 1..=j.min(p) {
                weight += self.phi[i - 1] * psi[j - i];
            }
            psi[j] = weight;
        }
        let mut cumulative = 0.0;
        let mut variance = Vec::with_capacity(horizon);
        for weight in psi {
            cumulative += weight * weight;
            variance.push(self.sigma2 * cumulative);
        }

        SeriesForecast::new(mean, variance)
    }
}
