//! AR model specification (unfitted).

use crate::error::ArError;
use crate::fit::ArFit;

/// An unfitted AR(p) model specification.
///
/// This is the entry point of the typestate workflow. Create a spec with
/// [`ArSpec::new()`], then call [`ArSpec::fit()`] to obtain an [`ArFit`].
///
/// # Typestate Workflow
///
/// ```mermaid
/// graph LR
///     A["ArSpec::new(p)"] -->|".fit(&data)?"| B["ArFit"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArSpec {
    p: usize,
}

impl ArSpec {
    /// Creates a new AR(p) specification with autoregressive order `p`.
    ///
    /// Order 0 is valid and fits white noise around the sample mean.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_ar::ArSpec;
    ///
    /// let spec = ArSpec::new(2);
    /// assert_eq!(spec.p(), 2);
    /// ```
    pub fn new(p: usize) -> Self {
        Self { p }
    }

    /// Returns the AR order (`p`).
    pub fn p(&self) -> usize {
        self.p
    }

    /// Fits this AR(p) specification to observed data via Yule-Walker
    /// estimation on the biased autocovariances, solved by the
    /// Levinson-Durbin recursion. The recursion keeps the fitted
    /// coefficients stationary; the innovation variance is re-estimated
    /// from the conditional residuals.
    ///
    /// Returns an [`ArFit`] containing the estimated coefficients (`phi`),
    /// innovation variance (`sigma2`), fitted values, residuals, and
    /// log-likelihood.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArError::EmptyData`] | `data` is empty |
    /// | [`ArError::InsufficientData`] | `data.len() < p + 2` |
    /// | [`ArError::NonFiniteData`] | any element is NaN or infinite |
    /// | [`ArError::ConstantData`] | all elements are identical |
    /// | [`ArError::NonStationary`] | a reflection coefficient leaves the unit circle |
    /// | [`ArError::DegenerateResiduals`] | residuals are exactly zero |
    pub fn fit(&self, data: &[f64]) -> Result<ArFit, ArError> {
        crate::levinson::fit_ar(*self, data)
    }
}
