//! AIC-based AR order selection and the naive fallback path.

use tracing::debug;

use crate::error::ArError;
use crate::fit::ArFit;
use crate::model::FittedModel;
use crate::naive::NaiveFit;
use crate::spec::ArSpec;

/// Selects the best AR(p) model from a search over orders 0..=`max_p`,
/// ranked by Akaike Information Criterion (AIC).
///
/// Fits every candidate order via [`ArSpec::fit()`], collects those that
/// converge, and returns the [`ArFit`] with the lowest [`ArFit::aic()`].
/// Candidates that fail to fit are skipped; ties keep the smaller order.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArError::AllCandidatesFailed`] | every order in 0..=`max_p` failed to fit |
pub fn auto_fit(data: &[f64], max_p: usize) -> Result<ArFit, ArError> {
    let mut best: Option<ArFit> = None;
    for p in 0..=max_p {
        match ArSpec::new(p).fit(data) {
            Ok(fit) => {
                let improves = best.as_ref().map(|b| fit.aic() < b.aic()).unwrap_or(true);
                if improves {
                    best = Some(fit);
                }
            }
            Err(err) => debug!(p, %err, "AR candidate rejected"),
        }
    }
    best.ok_or(ArError::AllCandidatesFailed { max_p })
}

/// Fits a series with [`auto_fit`], falling back to the naive forecaster
/// when no AR candidate converges.
///
/// Returns the fitted model and whether the fallback was taken. Short,
/// constant and otherwise degenerate series land on the fallback; data
/// that is empty or non-finite is an error either way.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArError::EmptyData`] | `data` is empty |
/// | [`ArError::NonFiniteData`] | any element is NaN or infinite |
pub fn fit_with_fallback(data: &[f64], max_p: usize) -> Result<(FittedModel, bool), ArError> {
    match auto_fit(data, max_p) {
        Ok(fit) => Ok((FittedModel::Ar(fit), false)),
        Err(err) => {
            debug!(%err, "falling back to the naive forecaster");
            let naive = NaiveFit::new(data)?;
            Ok((FittedModel::Naive(naive), true))
        }
    }
}
