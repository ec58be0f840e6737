//! Yule-Walker estimation via the Levinson-Durbin recursion.

use hermes_stats::autocovariance;

use crate::error::ArError;
use crate::fit::ArFit;
use crate::spec::ArSpec;

pub(crate) fn fit_ar(spec: ArSpec, data: &[f64]) -> Result<ArFit, ArError> {
    let p = spec.p();
    let n = data.len();
    if n == 0 {
        return Err(ArError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(ArError::NonFiniteData);
    }
    // p + 2 leaves at least two conditional residuals for sigma2.
    let min = p + 2;
    if n < min {
        return Err(ArError::InsufficientData { n, min });
    }
    if data.windows(2).all(|w| w[0] == w[1]) {
        return Err(ArError::ConstantData);
    }

    let mean = hermes_stats::mean(data);
    let acov: Vec<f64> = (0..=p).map(|k| autocovariance(data, k)).collect();
    if acov[0] <= 0.0 {
        return Err(ArError::ConstantData);
    }
    let phi = levinson_durbin(&acov)?;

    // One-step fitted values and conditional residuals. The first p steps
    // have no complete lag window and stay NaN.
    let mut fitted = vec![f64::NAN; n];
    let mut residuals = vec![f64::NAN; n];
    let mut sum_sq = 0.0;
    for t in p..n {
        let mut prediction = mean;
        for (i, &coefficient) in phi.iter().enumerate() {
            prediction += coefficient * (data[t - 1 - i] - mean);
        }
        fitted[t] = prediction;
        let e = data[t] - prediction;
        residuals[t] = e;
        sum_sq += e * e;
    }
    let n_eff = (n - p) as f64;
    let sigma2 = sum_sq / n_eff;
    if sigma2 <= 0.0 {
        return Err(ArError::DegenerateResiduals);
    }

    // Gaussian log-likelihood of the conditional residuals in closed form.
    let log_likelihood = -0.5 * n_eff * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);

    let tail: Vec<f64> = data[n - p..].iter().map(|y| y - mean).collect();
    Ok(ArFit::new(
        spec,
        mean,
        phi,
        sigma2,
        fitted,
        residuals,
        log_likelihood,
        tail,
    ))
}

/// Solve the Yule-Walker equations for autocovariances `acov[0..=p]`.
///
/// Every intermediate model the recursion visits is stationary, so a
/// reflection coefficient on or outside the unit circle aborts with
/// [`ArError::NonStationary`].
fn levinson_durbin(acov: &[f64]) -> Result<Vec<f64>, ArError> {
    let p = acov.len() - 1;
    let mut phi = vec![0.0; p];
    let mut error = acov[0];
    for k in 1..=p {
        let mut acc = acov[k];
        for j in 1..k {
            acc -= phi[j - 1] * acov[k - j];
        }
        let reflection = acc / error;
        if !reflection.is_finite() || reflection.abs() >= 1.0 {
            return Err(ArError::NonStationary { lag: k });
        }
        let previous = phi.clone();
        phi[k - 1] = reflection;
        for j in 1..k {
            phi[j - 1] = previous[j - 1] - reflection * previous[k - 1 - j];
        }
        error *= 1.0 - reflection * reflection;
    }
    Ok(phi)
}
