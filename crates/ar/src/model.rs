//! Either fitted forecaster behind one interface.

use crate::fit::ArFit;
use crate::forecast::SeriesForecast;
use crate::naive::NaiveFit;

/// A fitted per-series forecaster: an AR model when one could be
/// estimated, otherwise the naive fallback.
#[derive(Clone, Debug)]
pub enum FittedModel {
    /// AR(p) fit selected by AIC.
    Ar(ArFit),
    /// Random walk fallback.
    Naive(NaiveFit),
}

impl FittedModel {
    /// One-step fitted values over the training window. The incomplete
    /// head (p steps for AR, one for naive) is NaN.
    pub fn fitted(&self) -> &[f64] {
        match self {
            FittedModel::Ar(fit) => fit.fitted(),
            FittedModel::Naive(fit) => fit.fitted(),
        }
    }

    /// One-step residuals over the training window, NaN head included.
    pub fn residuals(&self) -> &[f64] {
        match self {
            FittedModel::Ar(fit) => fit.residuals(),
            FittedModel::Naive(fit) => fit.residuals(),
        }
    }

    /// Innovation variance of the fitted model.
    pub fn sigma2(&self) -> f64 {
        match self {
            FittedModel::Ar(fit) => fit.sigma2(),
            FittedModel::Naive(fit) => fit.sigma2(),
        }
    }

    /// Forecasts `horizon` steps ahead.
    pub fn forecast(&self, horizon: usize) -> SeriesForecast {
        match self {
            FittedModel::Ar(fit) => fit.forecast(horizon),
            FittedModel::Naive(fit) => fit.forecast(horizon),
        }
    }

    /// Short human-readable label, for logs.
    pub fn description(&self) -> String {
        match self {
            FittedModel::Ar(fit) => format!("ar({})", fit.spec().p()),
            FittedModel::Naive(_) => "naive".to_string(),
        }
    }

    /// Whether this is the naive fallback.
    pub fn is_naive(&self) -> bool {
        matches!(self, FittedModel::Naive(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_names_the_model() {
        let ar = FittedModel::Ar(crate::ArSpec::new(1).fit(&[2.0, 1.0, 3.0, 0.0, 2.0]).unwrap());
        assert_eq!(ar.description(), "ar(1)");
        assert!(!ar.is_naive());

        let naive = FittedModel::Naive(NaiveFit::new(&[1.0, 2.0]).unwrap());
        assert_eq!(naive.description(), "naive");
        assert!(naive.is_naive());
    }

    #[test]
    fn forecast_dispatches_to_inner_model() {
        let naive = FittedModel::Naive(NaiveFit::new(&[1.0, 4.0]).unwrap());
        let forecast = naive.forecast(2);
        assert_eq!(forecast.mean(), &[4.0, 4.0]);
    }

    #[test]
    fn residuals_dispatch_to_inner_model() {
        let naive = FittedModel::Naive(NaiveFit::new(&[1.0, 4.0, 2.0]).unwrap());
        assert!(naive.residuals()[0].is_nan());
        assert_eq!(&naive.residuals()[1..], &[3.0, -2.0]);
    }
}
